use crate::error::SettingsError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_YEAR: i32 = 2010;
pub const DEFAULT_MAX_YEAR: i32 = 2050;

/// What to do with a record whose timestamp is missing, unparseable or
/// outside the plausible years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplausibleTimestampPolicy {
    /// Replace the timestamp with the current wall-clock time.
    #[default]
    SubstituteNow,
    Drop,
    /// Fail the whole batch.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    #[default]
    Zero,
    Drop,
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrder {
    /// Oldest first, as charts consume it.
    #[default]
    Ascending,
    /// Newest first, as storage consumers read it.
    Descending,
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerSettings {
    pub min_year: i32,
    pub max_year: i32,
    pub on_implausible_timestamp: ImplausibleTimestampPolicy,
    pub on_missing_value: MissingValuePolicy,
    pub order: SeriesOrder,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            on_implausible_timestamp: Default::default(),
            on_missing_value: Default::default(),
            order: Default::default(),
        }
    }
}

impl NormalizerSettings {
    /// Bounds used for records that come from local state rather than the
    /// external API.
    pub fn local_state() -> Self {
        Self {
            min_year: 2000,
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, policy: ImplausibleTimestampPolicy) -> Self {
        self.on_implausible_timestamp = policy;
        self
    }

    pub fn with_missing_value(mut self, policy: MissingValuePolicy) -> Self {
        self.on_missing_value = policy;
        self
    }

    pub fn with_order(mut self, order: SeriesOrder) -> Self {
        self.order = order;
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_year > self.max_year {
            return Err(SettingsError::InvertedYears {
                min_year: self.min_year,
                max_year: self.max_year,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inverted_years_are_rejected() {
        let settings = NormalizerSettings {
            min_year: 2060,
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::InvertedYears {
                min_year: 2060,
                max_year: DEFAULT_MAX_YEAR
            })
        );
        assert_eq!(NormalizerSettings::local_state().validate(), Ok(()));
    }

    #[test]
    fn deserializes_policies_in_snake_case() {
        let settings: NormalizerSettings = serde_json::from_value(serde_json::json!({
            "on_implausible_timestamp": "drop",
            "order": "descending"
        }))
        .unwrap();
        assert_eq!(
            settings,
            NormalizerSettings::default()
                .with_policy(ImplausibleTimestampPolicy::Drop)
                .with_order(SeriesOrder::Descending)
        );
    }
}
