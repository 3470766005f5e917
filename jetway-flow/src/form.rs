use std::collections::HashMap;

use jetway_core::validation::{self, DetailField};
use jetway_core::{Passenger, PassengerExtraDetails, PaxKey};

#[derive(Debug, Clone)]
struct Draft {
    details: PassengerExtraDetails,
    touched_nationality: bool,
    touched_phone: bool,
}

impl Draft {
    fn empty(country_code: &str) -> Self {
        Self {
            details: PassengerExtraDetails::empty(country_code),
            touched_nationality: false,
            touched_phone: false,
        }
    }

    fn touched(&self, field: DetailField) -> bool {
        match field {
            DetailField::Nationality => self.touched_nationality,
            DetailField::Phone => self.touched_phone,
        }
    }

    fn value(&self, field: DetailField) -> &str {
        match field {
            DetailField::Nationality => &self.details.nationality,
            DetailField::Phone => &self.details.phone,
        }
    }
}

/// Draft travel-document values for the passenger-details step.
///
/// One draft per passenger key plus per-field touched flags. Validation
/// errors are suppressed until a field has been touched, but overall
/// validity always reflects the current values. Unknown keys are
/// tolerated on every mutator, a stale callback must not panic.
#[derive(Debug, Default)]
pub struct PassengerFormState {
    order: Vec<PaxKey>,
    drafts: HashMap<PaxKey, Draft>,
}

impl PassengerFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one draft per passenger, keyed canonically, in the given
    /// order. Re-initializing with the same passengers keeps whatever
    /// was already typed; passengers no longer in the list lose their
    /// draft.
    pub fn initialize(&mut self, passengers: &[&Passenger], default_country_code: &str) {
        let order: Vec<PaxKey> = passengers.iter().map(|p| p.key()).collect();
        let mut drafts = HashMap::with_capacity(order.len());
        for key in &order {
            let draft = self
                .drafts
                .remove(key)
                .unwrap_or_else(|| Draft::empty(default_country_code));
            drafts.insert(key.clone(), draft);
        }
        self.order = order;
        self.drafts = drafts;
    }

    /// Replace one field's value. Nationality is upper-cased on write.
    /// Does not mark the field touched.
    pub fn update_field(&mut self, key: &PaxKey, field: DetailField, value: &str) {
        let Some(draft) = self.drafts.get_mut(key) else {
            return;
        };
        match field {
            DetailField::Nationality => draft.details.nationality = value.to_ascii_uppercase(),
            DetailField::Phone => draft.details.phone = value.to_string(),
        }
    }

    pub fn set_country_code(&mut self, key: &PaxKey, code: &str) {
        if let Some(draft) = self.drafts.get_mut(key) {
            draft.details.country_code = code.to_string();
        }
    }

    /// Mark a field touched, typically on blur. Errors only render for
    /// touched fields.
    pub fn set_touched(&mut self, key: &PaxKey, field: DetailField) {
        let Some(draft) = self.drafts.get_mut(key) else {
            return;
        };
        match field {
            DetailField::Nationality => draft.touched_nationality = true,
            DetailField::Phone => draft.touched_phone = true,
        }
    }

    /// The display error for one field, or None while the field is
    /// untouched.
    pub fn field_error(&self, key: &PaxKey, field: DetailField) -> Option<&'static str> {
        let draft = self.drafts.get(key)?;
        if !draft.touched(field) {
            return None;
        }
        validation::validate(field, draft.value(field))
            .map(|kind| validation::display_text(field, kind))
    }

    pub fn field_value(&self, key: &PaxKey, field: DetailField) -> Option<&str> {
        self.drafts.get(key).map(|draft| draft.value(field))
    }

    pub fn country_code(&self, key: &PaxKey) -> Option<&str> {
        self.drafts.get(key).map(|d| d.details.country_code.as_str())
    }

    /// Passenger keys in draft order.
    pub fn keys(&self) -> &[PaxKey] {
        &self.order
    }

    /// True when a draft exists for every given key and each of those
    /// drafts' nationality and phone validate on their current values.
    /// A key with no draft fails the whole set. Touch state plays no
    /// part here.
    pub fn is_valid(&self, keys: &[PaxKey]) -> bool {
        keys.iter().all(|key| {
            self.drafts.get(key).is_some_and(|draft| {
                validation::validate_nationality(&draft.details.nationality).is_none()
                    && validation::validate_phone(&draft.details.phone).is_none()
            })
        })
    }

    /// Clone the current drafts, keyed by passenger, for merging into
    /// the session.
    pub fn captured_details(&self) -> HashMap<PaxKey, PassengerExtraDetails> {
        self.drafts
            .iter()
            .map(|(key, draft)| (key.clone(), draft.details.clone()))
            .collect()
    }

    pub fn reset(&mut self) {
        self.order.clear();
        self.drafts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetway_core::models::PaxType;

    fn passenger(first: &str, last: &str) -> Passenger {
        Passenger {
            id: None,
            first_name: first.to_string(),
            last_name: last.to_string(),
            pax_type: PaxType::Adt,
            seat: None,
            boarding_zone: None,
            boarding_sequence: None,
            checked_in: false,
            phone_number: None,
            nationality: None,
            document_number: None,
        }
    }

    #[test]
    fn initialize_seeds_one_draft_per_passenger() {
        let alex = passenger("ALEX", "HUUM");
        let somsee = passenger("Somsee", "Kuum");
        let mut form = PassengerFormState::new();
        form.initialize(&[&alex, &somsee], "+66");

        assert_eq!(form.keys().len(), 2);
        assert_eq!(form.country_code(&alex.key()), Some("+66"));
        assert_eq!(form.field_value(&alex.key(), DetailField::Phone), Some(""));
    }

    #[test]
    fn reinitializing_keeps_typed_values_and_drops_removed_passengers() {
        let alex = passenger("ALEX", "HUUM");
        let somsee = passenger("Somsee", "Kuum");
        let mut form = PassengerFormState::new();
        form.initialize(&[&alex, &somsee], "+66");
        form.update_field(&alex.key(), DetailField::Phone, "812345678");

        form.initialize(&[&alex], "+66");

        assert_eq!(
            form.field_value(&alex.key(), DetailField::Phone),
            Some("812345678")
        );
        assert!(form.field_value(&somsee.key(), DetailField::Phone).is_none());
    }

    #[test]
    fn nationality_is_upper_cased_on_write() {
        let alex = passenger("ALEX", "HUUM");
        let mut form = PassengerFormState::new();
        form.initialize(&[&alex], "+66");

        form.update_field(&alex.key(), DetailField::Nationality, "th");
        assert_eq!(
            form.field_value(&alex.key(), DetailField::Nationality),
            Some("TH")
        );
    }

    #[test]
    fn errors_are_suppressed_until_touched() {
        let alex = passenger("ALEX", "HUUM");
        let key = alex.key();
        let mut form = PassengerFormState::new();
        form.initialize(&[&alex], "+66");

        // empty phone is invalid, but untouched fields stay quiet
        assert_eq!(form.field_error(&key, DetailField::Phone), None);

        form.set_touched(&key, DetailField::Phone);
        assert_eq!(
            form.field_error(&key, DetailField::Phone),
            Some("Phone number is required")
        );

        form.update_field(&key, DetailField::Phone, "123");
        assert_eq!(
            form.field_error(&key, DetailField::Phone),
            Some("Phone number too short")
        );

        form.update_field(&key, DetailField::Phone, "81 234 5678");
        assert_eq!(form.field_error(&key, DetailField::Phone), None);
    }

    #[test]
    fn validity_ignores_touch_state() {
        let alex = passenger("ALEX", "HUUM");
        let key = alex.key();
        let mut form = PassengerFormState::new();
        form.initialize(&[&alex], "+66");

        assert!(!form.is_valid(&[key.clone()]));

        // never touched, still counts
        form.update_field(&key, DetailField::Nationality, "TH");
        form.update_field(&key, DetailField::Phone, "812345678");
        assert!(form.is_valid(&[key]));
    }

    #[test]
    fn validity_requires_a_draft_for_every_key() {
        let alex = passenger("ALEX", "HUUM");
        let somsee = passenger("Somsee", "Kuum");
        let mut form = PassengerFormState::new();
        form.initialize(&[&alex], "+66");
        form.update_field(&alex.key(), DetailField::Nationality, "TH");
        form.update_field(&alex.key(), DetailField::Phone, "812345678");

        assert!(form.is_valid(&[alex.key()]));
        // a key that was never drafted fails the whole set
        assert!(!form.is_valid(&[alex.key(), somsee.key()]));
        assert!(form.is_valid(&[]));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let alex = passenger("ALEX", "HUUM");
        let stranger = PaxKey::derive(None, "NO", "BODY");
        let mut form = PassengerFormState::new();
        form.initialize(&[&alex], "+66");

        form.update_field(&stranger, DetailField::Phone, "812345678");
        form.set_touched(&stranger, DetailField::Phone);
        form.set_country_code(&stranger, "+65");

        assert_eq!(form.field_error(&stranger, DetailField::Phone), None);
        assert!(form.field_value(&stranger, DetailField::Phone).is_none());
    }
}
