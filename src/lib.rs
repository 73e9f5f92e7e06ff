//! formwork: async validation orchestration for form component trees.
//!
//! A [`Form`](validation::Form) aggregates child validatable components,
//! orchestrates their validation lifecycle, and manages submit, reset, and
//! focus behavior. Rendering and host lifecycle stay outside: the host
//! wires an event sink, focus targets, and a wakeup channel instead.

pub mod event;
pub mod focus;
pub mod validation;
pub mod wakeup;

pub use validation::Form;

pub mod prelude {
    pub use crate::event::{FormEvent, FormEventReceiver, FormEventSender, InteractionEvent};
    pub use crate::focus::{FocusId, FocusScope, FocusTarget};
    pub use crate::validation::{
        BindingId, Field, FieldBuilder, Form, FormOptions, FormValidation, Validatable,
        Validation, ValidationError,
    };
    pub use crate::wakeup::{WakeupHandle, WakeupReceiver, WakeupSender};
}
