pub mod date_codec;
