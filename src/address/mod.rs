pub mod matchers;
pub mod parser;
pub mod substitution;
