//! Content validation for raw submissions.
//!
//! Pure functions: no I/O, no side effects. Bounds differ by caller class,
//! guests get a higher content floor and must supply a display name.

use serde::{Deserialize, Serialize};

use crate::types::{PostKind, PostType};

/// Reasons a submission is rejected before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Trimmed content outside the caller-class bounds
    #[error("Content must be between {min} and {max} characters, got {actual}")]
    ContentLength { min: usize, max: usize, actual: usize },

    /// Trimmed guest name outside bounds
    #[error("Name must be between {min} and {max} characters, got {actual}")]
    GuestNameLength { min: usize, max: usize, actual: usize },

    /// Guest submission without a name
    #[error("Guest submissions require a name")]
    MissingGuestName,

    /// Rating outside 1..=5
    #[error("Star rating must be an integer between 1 and 5, got {0}")]
    StarRating(i64),

    /// Verified insight without a pillar of truth
    #[error("Verified insights require a pillar of truth")]
    MissingPillar,

    /// Empty target entity id
    #[error("Target entity is required")]
    MissingTarget,
}

/// Who is submitting, which selects the content bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerClass {
    Authenticated,
    Guest,
}

/// Length bounds, in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub authenticated_min_chars: usize,
    pub guest_min_chars: usize,
    pub max_chars: usize,
    pub guest_name_min_chars: usize,
    pub guest_name_max_chars: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            authenticated_min_chars: 3,
            guest_min_chars: 10,
            max_chars: 2000,
            guest_name_min_chars: 2,
            guest_name_max_chars: 50,
        }
    }
}

impl ValidationLimits {
    fn content_floor(&self, class: CallerClass) -> usize {
        match class {
            CallerClass::Authenticated => self.authenticated_min_chars,
            CallerClass::Guest => self.guest_min_chars,
        }
    }
}

/// Raw fields as they arrive from a caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawContent<'a> {
    pub content: &'a str,
    pub star_rating: Option<i64>,
    pub guest_name: Option<&'a str>,
}

/// Trimmed and checked fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContent {
    pub content: String,
    pub star_rating: Option<u8>,
    pub guest_name: Option<String>,
}

/// Validate content, rating and (for guests) name.
pub fn validate_content(
    raw: RawContent<'_>,
    class: CallerClass,
    limits: &ValidationLimits,
) -> Result<ValidatedContent, ValidationError> {
    let content = raw.content.trim();
    let actual = content.chars().count();
    let min = limits.content_floor(class);
    if actual < min || actual > limits.max_chars {
        return Err(ValidationError::ContentLength {
            min,
            max: limits.max_chars,
            actual,
        });
    }

    let guest_name = match class {
        CallerClass::Guest => {
            let name = raw
                .guest_name
                .map(str::trim)
                .ok_or(ValidationError::MissingGuestName)?;
            let actual = name.chars().count();
            if actual < limits.guest_name_min_chars || actual > limits.guest_name_max_chars {
                return Err(ValidationError::GuestNameLength {
                    min: limits.guest_name_min_chars,
                    max: limits.guest_name_max_chars,
                    actual,
                });
            }
            Some(name.to_string())
        }
        CallerClass::Authenticated => None,
    };

    Ok(ValidatedContent {
        content: content.to_string(),
        star_rating: validate_star_rating(raw.star_rating)?,
        guest_name,
    })
}

/// Accept an absent rating or an integer in 1..=5.
pub fn validate_star_rating(rating: Option<i64>) -> Result<Option<u8>, ValidationError> {
    match rating {
        None => Ok(None),
        Some(r @ 1..=5) => Ok(Some(r as u8)),
        Some(r) => Err(ValidationError::StarRating(r)),
    }
}

/// Resolve the post kind. A pillar sent with a community experience is dropped.
pub fn resolve_post_kind(
    post_type: PostType,
    pillar_of_truth: Option<&str>,
) -> Result<PostKind, ValidationError> {
    match post_type {
        PostType::VerifiedInsight => {
            let pillar = pillar_of_truth
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .ok_or(ValidationError::MissingPillar)?;
            Ok(PostKind::VerifiedInsight {
                pillar_of_truth: pillar.to_string(),
            })
        }
        PostType::CommunityExperience => Ok(PostKind::CommunityExperience),
    }
}

/// Reject blank target ids.
pub fn validate_target(target_entity_id: &str) -> Result<String, ValidationError> {
    let target = target_entity_id.trim();
    if target.is_empty() {
        return Err(ValidationError::MissingTarget);
    }
    Ok(target.to_string())
}
