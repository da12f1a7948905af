//! Rendering of answers and ranked passages into escaped display markup.
//!
//! - [`highlight`]: query-term emphasis inside passages
//! - [`render_answer`] / [`render_error`]: the answer area
//! - [`render_results`]: one card per ranked passage
//!
//! All backend text is escaped; see [`markup`].

pub mod answer;
pub mod fragment;
pub mod highlight;
pub mod markup;
pub mod results;

pub use answer::{NO_ANSWER_PLACEHOLDER, render_answer, render_error};
pub use fragment::{DisplayFragment, fragments_to_html};
pub use highlight::{Highlighter, highlight};
pub use markup::{Markup, Node, escape_html};
pub use results::{NO_RESULTS_PLACEHOLDER, ParseScoreStyleError, ResultCard, ScoreStyle, render_results};
