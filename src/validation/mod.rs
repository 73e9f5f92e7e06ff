//! Form validation orchestration.
//!
//! A [`Form`] tracks a dynamic set of bound [`Validatable`] components,
//! runs their validation (sync or deferred) on demand, aggregates failures
//! under fail-fast or collect-all policy, and discards outcomes of runs
//! superseded by a newer validate/reset cycle.
//!
//! # Example
//!
//! ```ignore
//! use formwork::prelude::*;
//!
//! let form = Form::with_options(FormOptions::new().with_autofocus());
//! let mut events = form.subscribe();
//!
//! let name = Field::builder(String::new())
//!     .required("Name is required")
//!     .min_length(3, "Name must be at least 3 characters")
//!     .build();
//! form.bind(Arc::new(name.clone()));
//!
//! if form.validate().await.is_valid() {
//!     // Proceed with form submission
//! }
//! ```

mod form;
mod outcome;
mod registry;
pub mod rules;
mod validatable;

pub use form::{Form, FormOptions};
pub use outcome::FormValidation;
pub use registry::{BindingId, Registry};
pub use rules::{Field, FieldBuilder, FieldId};
pub use validatable::{BoxFuture, Validatable, Validation, ValidationError};
