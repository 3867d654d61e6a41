pub mod cleaner;
pub mod corpus;
pub mod excerpt;
pub mod markov;
pub mod pipeline;
pub mod validator;
