//! # Lofi Core
//!
//! Parser for Lofi, a lightweight human-writable microformat.
//!
//! Each line may carry free text, *mentions* (`@person.name`) and *tags*
//! (`#button`, `#variation: danger`). A line may bind a name with a leading
//! `@name:`. Lines starting with `-` nest one level under the previous line,
//! and empty lines separate sections.
//!
//! ## Quick Start
//!
//! ```rust
//! use lofi_core::{parse_element, parse_sections, TagValue};
//!
//! let element = parse_element("@cta: Hello @user.name #button #variation: danger");
//! assert_eq!(element.introducing.as_deref(), Some("cta"));
//! assert_eq!(element.mentions, vec![vec!["user", "name"]]);
//! assert!(element.has_flag("button"));
//! assert!(matches!(element.tag("variation"), Some(TagValue::Content(_))));
//!
//! let document = parse_sections("Menu\n- Home\n- About\n\nFooter");
//! assert_eq!(document.len(), 2);
//! assert_eq!(document[0][0].children.len(), 2);
//! ```
//!
//! ## Tolerance
//!
//! Parsing never fails. Sigils that do not start a valid tag or mention
//! (`#` or `@` not followed by `[A-Za-z0-9_-]`) stay in the text. All
//! scanners run in linear time, so adversarial input cannot blow up.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod scan;
pub mod stats;

pub use ast::{Content, CowStr, Document, Element, KeyPath, Section, TagValue};
pub use parser::{parse_element, parse_section, parse_sections};
pub use stats::DocumentStats;
