//! Console core: lifecycle, wizard, batch, import and search logic
//!
//! The modules here own all state and failure-handling semantics of the
//! operator console; rendering and transport live outside (CLI interface,
//! gateway layer).
//!
//! - `session`: explicit session context (selection set, in-flight guard,
//!   filters, pagination)
//! - `wizard`: 3-step creation form state machine
//! - `batch`: sequential, partial-failure-tolerant bulk delete/export
//! - `import`: CSV/JSON upload parsing and one-shot bulk submission
//! - `search`: quick display-time filter and advanced search composition
//! - `controller`: the command surface a view layer binds to

pub mod batch;
pub mod controller;
pub mod import;
pub mod search;
pub mod session;
pub mod wizard;

pub use batch::{BatchExport, BatchItemError, BatchOutcome, BatchReport};
pub use controller::{DoubleConfirmation, LinkConsole};
pub use import::{ImportCandidate, ImportFormat};
pub use search::{QuickFilter, SearchForm};
pub use session::{ConsoleSession, SelectionSet};
pub use wizard::{CreationWizard, WizardDraft, TOTAL_STEPS};
