//! Trust Core - domain rules for community contributions
//!
//! Pure, I/O-free building blocks of the contribution pipeline:
//!
//! - **Data model**: contributions, contributor profiles, summons, signals, citations
//! - **Validation**: content, guest name and rating bounds per caller class
//! - **Roles**: expert and official-responder classification
//! - **Blacklist**: keyword scanning for auto-flagging
//! - **Citations**: title derivation for source links
//! - **Chakra tiers**: display banding of reputation scores
//!
//! # Example
//!
//! ```
//! use trust_core::{ChakraTable, ContributorProfile, RoleClassifier};
//!
//! let profile = ContributorProfile::new("user-1").with_score(120);
//! assert!(RoleClassifier::default().is_expert(&profile));
//! assert_eq!(ChakraTable::standard().tier_for(profile.contributor_score).name, "Solar Plexus");
//! ```

pub mod blacklist;
pub mod chakra;
pub mod citation;
pub mod roles;
pub mod types;
pub mod validation;

// Re-export main types
pub use blacklist::{BlacklistMatch, KeywordList};
pub use chakra::{ChakraError, ChakraTable, ChakraTier, TierProgress};
pub use citation::citation_title;
pub use roles::RoleClassifier;
pub use types::*;
pub use validation::{
    resolve_post_kind, validate_content, validate_star_rating, validate_target, CallerClass,
    RawContent, ValidatedContent, ValidationError, ValidationLimits,
};
