// #![include_doc("../README.md", start)]
//! # uri-pattern
//!
//! URI pattern matching, variable resolution and expansion.
//!
//! ## Overview
//!
//! `uri-pattern` compiles URI templates based on an early draft of the URI Template
//! specification and uses them in both directions: expanding variables into a URI,
//! and matching a URI to recover the variables it was expanded from. A router can
//! bind the variables of one pattern and expand them into another to rewrite or
//! redirect requests.
//!
//! ## Features
//!
//! - Five expression operators: `{var}`, `{+var}`, `{/var}`, `{;var}` and `{?var}`
//! - List (`{@var}`) and map (`{%var}`) variables
//! - Default values (`{var=default}`), type tags (`{type:var}`) and prefixes (`{var:3}`)
//! - A literal `*` is shorthand for `{+wildcard}`
//! - Values are normalized to NFC before percent-encoding
//!
//! ## Usage
//!
//! ### Expansion
//!
//! ```rust
//! use uri_pattern::{Parameters, UriPattern};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pattern = UriPattern::new("/users/{user}/files{/path}{?page}")?;
//!     let mut params = Parameters::new();
//!     params.set("user", "ben & jerry").set("path", "a/b").set("page", "2");
//!
//!     let uri = pattern.expand(&params);
//!     assert_eq!(uri, "/users/ben%20%26%20jerry/files/a%2Fb?page=2");
//!     Ok(())
//! }
//! ```
//!
//! ### Resolution
//!
//! ```rust
//! use uri_pattern::UriPattern;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pattern = UriPattern::new("/filter{;x,y}/list")?;
//!     let result = pattern.resolve("/filter;y=2;x=1/list");
//!
//!     assert!(result.is_resolved());
//!     assert_eq!(result.get("x"), Some("1"));
//!     assert_eq!(result.get("y"), Some("2"));
//!     Ok(())
//! }
//! ```
//!
//! ### Relocation
//!
//! ```rust
//! use uri_pattern::UriPattern;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let from = UriPattern::new("/old/*")?;
//!     let to = UriPattern::new("/new/{+wildcard}")?;
//!
//!     let result = from.resolve("/old/docs/index.html");
//!     assert_eq!(to.expand(result.to_parameters()), "/new/docs/index.html");
//!     Ok(())
//! }
//! ```
//!
//! ## License
//!
//! This project is dual licensed under Apache-2.0/MIT.
// #![include_doc("../README.md", end)]
