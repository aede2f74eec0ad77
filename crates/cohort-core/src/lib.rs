//! Cohort domain core
//!
//! The enrollment logic of a blinded study portal:
//! - **Sequence config**: the ordered, cyclic group list driving automatic
//!   allocation ([`sequence`])
//! - **Enrollment ledger**: append-only subject-to-group record whose
//!   length drives sequential indexing ([`ledger`])
//! - **Credential directory**: per-subject login codes plus optional
//!   forced-group overrides ([`credentials`])
//! - **Allocation engine**: idempotent, serialized `enroll` with
//!   forced-over-sequential precedence ([`allocation`])
//! - **Authentication**: subject and fixed-role predicates ([`auth`])
//! - **Administration**: wholesale sequence replacement, full reset,
//!   roster views ([`admin`])
//!
//! All persistence goes through the injected [`cohort_store::StudyStore`];
//! the core never hides store failures.
//!
//! # Quick start
//!
//! ```rust
//! use cohort_core::{AllocationEngine, credentials, auth};
//! use cohort_store::MemoryStore;
//!
//! let engine = AllocationEngine::new(MemoryStore::new());
//! let code = credentials::issue(engine.store(), "sub-001", None)?;
//! assert!(auth::verify_subject(engine.store(), "sub-001", &code)?);
//!
//! let enrollment = engine.enroll("sub-001")?;
//! println!("assigned to {}", enrollment.group.group_name);
//! # Ok::<(), cohort_core::CoreError>(())
//! ```

pub mod admin;
pub mod allocation;
pub mod auth;
pub mod credentials;
pub mod error;
pub mod ledger;
pub mod sequence;
pub mod types;

mod records;

pub use allocation::{AllocationEngine, AllocationKind, Enrollment};
pub use auth::{CredentialPair, Role, RoleCredentials};
pub use error::CoreError;
pub use types::{GroupAssignment, SubjectCredential, SubjectRecord};
