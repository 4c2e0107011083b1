pub mod cmd;
pub mod stdout_predicates;
