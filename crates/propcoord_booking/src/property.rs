use propcoord_common::services::CalendarId;
use propcoord_config::PropertiesConfig;
use std::collections::HashMap;

use crate::error::PropertyError;

/// Static property -> calendar lookup.
#[derive(Debug, Clone)]
pub struct PropertyResolver {
    active: String,
    calendars: HashMap<String, CalendarId>,
}

impl PropertyResolver {
    pub fn new(config: &PropertiesConfig) -> Self {
        Self {
            active: config.active.clone(),
            calendars: config
                .calendars
                .iter()
                .map(|(key, id)| (key.clone(), CalendarId::new(id.clone())))
                .collect(),
        }
    }

    pub fn active_property(&self) -> &str {
        &self.active
    }

    pub fn resolve_calendar_id(&self, property_key: &str) -> Result<CalendarId, PropertyError> {
        self.calendars
            .get(property_key)
            .filter(|id| !id.as_str().trim().is_empty())
            .cloned()
            .ok_or_else(|| PropertyError::UnknownProperty(property_key.to_string()))
    }

    pub fn active_calendar_id(&self) -> Result<CalendarId, PropertyError> {
        self.resolve_calendar_id(&self.active)
    }
}
