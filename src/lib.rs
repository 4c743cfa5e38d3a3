pub mod assemble;
pub mod cli;
pub mod codebehind;
pub mod config;
pub mod convert;
pub mod helpers;
pub mod mapping;
pub mod markup;
pub mod reporter;
pub mod transform;
