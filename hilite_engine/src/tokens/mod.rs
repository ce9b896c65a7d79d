pub mod clojure;
pub mod csharp;
pub mod fortran;
pub mod stream;
pub mod token;

pub use clojure::ClojureTokenKind;
pub use csharp::CSharpTokenKind;
pub use fortran::FortranTokenKind;
pub use stream::TokenStream;
pub use token::{Token, TokenCategory, TokenClass};
