// Text preprocessing: stop-word sets and the headline tokenizer.

pub mod stop_words;
pub mod tokenize;
