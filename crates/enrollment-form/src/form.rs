//! Country selection and phone entry state machine.

use crate::error::FormError;
use crate::format::{format_phone, strip_digits, validation_message};
use softpoint_client::{default_country, Catalog, Country, VerificationRequest};

/// Lifecycle phase, derived from the state vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No catalog loaded yet.
    Idle,
    /// Catalog loaded, dropdown closed.
    Ready,
    /// Dropdown open, full list visible.
    Browsing,
    /// Dropdown open with a search filter applied.
    Filtered,
    /// A verification request is in flight.
    Submitting,
}

/// Enrollment form state.
///
/// Purely synchronous; every method is a reaction to one user or
/// network-completion event. Validity is derived, never stored:
/// `is_valid()` holds iff the digit count equals the selected
/// country's required phone length.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentForm {
    countries: Vec<Country>,
    visible: Vec<Country>,
    selected: Option<Country>,
    phone_digits: String,
    phone_display: String,
    search_term: String,
    dropdown_open: bool,
    error_message: Option<String>,
    submitting: bool,
}

impl EnrollmentForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the fetched catalog: store the name-sorted list and select
    /// the default country. An empty catalog leaves the form idle.
    pub fn load_catalog(&mut self, catalog: &Catalog) {
        self.countries = catalog.sorted_by_name();
        self.visible = self.countries.clone();
        self.selected = default_country(&self.countries);
    }

    pub fn phase(&self) -> Phase {
        if self.submitting {
            Phase::Submitting
        } else if self.countries.is_empty() {
            Phase::Idle
        } else if self.dropdown_open && !self.search_term.is_empty() {
            Phase::Filtered
        } else if self.dropdown_open {
            Phase::Browsing
        } else {
            Phase::Ready
        }
    }

    pub fn selected(&self) -> Option<&Country> {
        self.selected.as_ref()
    }

    /// Digit count the selected country requires.
    pub fn required_digits(&self) -> Option<usize> {
        self.selected.as_ref().map(|c| c.phone_length)
    }

    /// Countries currently visible in the dropdown (filtered view).
    pub fn visible_countries(&self) -> &[Country] {
        &self.visible
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn phone_digits(&self) -> &str {
        &self.phone_digits
    }

    pub fn phone_display(&self) -> &str {
        &self.phone_display
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether the entered number satisfies the selected country's
    /// required digit count. False when no country is selected.
    pub fn is_valid(&self) -> bool {
        self.selected
            .as_ref()
            .map(|c| self.phone_digits.len() == c.phone_length)
            .unwrap_or(false)
    }

    pub fn open_dropdown(&mut self) {
        self.dropdown_open = true;
    }

    /// Close the dropdown. Also the target for pointer interaction
    /// detected outside the dropdown bounds. The search term survives,
    /// so reopening shows the prior filter.
    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    /// Filter the country list by case-insensitive substring match on
    /// name. An empty term restores the full name-sorted list.
    pub fn search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.dropdown_open = true;

        if term.is_empty() {
            self.visible = self.countries.clone();
        } else {
            let needle = term.to_lowercase();
            self.visible = self
                .countries
                .iter()
                .filter(|c| c.name.to_lowercase().contains(&needle))
                .cloned()
                .collect();
        }
    }

    /// Select the country at `index` in the visible list: the length
    /// constraint moves to the new country, the dropdown closes, and
    /// the current digits are re-validated against the new constraint.
    pub fn pick(&mut self, index: usize) -> Result<(), FormError> {
        let country = self
            .visible
            .get(index)
            .cloned()
            .ok_or(FormError::InvalidSelection(index))?;

        self.selected = Some(country);
        self.dropdown_open = false;
        self.revalidate();
        Ok(())
    }

    /// Accept raw phone input: non-digits are stripped, the display is
    /// re-rendered with 3-3-4 grouping, and the digit count is checked
    /// against the selected country.
    pub fn phone_input(&mut self, text: &str) {
        self.phone_digits = strip_digits(text);
        self.phone_display = format_phone(&self.phone_digits);

        if self.selected.is_some() {
            self.revalidate();
        } else {
            // No constraint to measure against.
            self.error_message = None;
        }
    }

    /// Guarded entry into submission: requires a selected country, a
    /// non-empty number, and no submission already in flight. Returns
    /// the digits-only request to send.
    pub fn begin_submit(&mut self) -> Result<VerificationRequest, FormError> {
        if self.submitting {
            return Err(FormError::SubmissionInFlight);
        }
        let country = self.selected.as_ref().ok_or(FormError::NoCountrySelected)?;
        if self.phone_digits.is_empty() {
            return Err(FormError::EmptyPhoneNumber);
        }

        let request = VerificationRequest {
            phone_number: self.phone_digits.clone(),
            country_id: country.id.clone(),
        };
        self.submitting = true;
        Ok(request)
    }

    /// Submission succeeded: reset to the default country and clear
    /// phone, search, and error state.
    pub fn complete_submit(&mut self) {
        self.submitting = false;
        self.selected = default_country(&self.countries);
        self.phone_digits.clear();
        self.phone_display.clear();
        self.search_term.clear();
        self.visible = self.countries.clone();
        self.dropdown_open = false;
        self.error_message = None;
    }

    /// Submission failed: leave the form exactly as it was, so the
    /// user can retry. The failure itself travels back to the caller
    /// as the error of the async submission.
    pub fn abort_submit(&mut self) {
        self.submitting = false;
    }

    fn revalidate(&mut self) {
        if let Some(country) = &self.selected {
            self.error_message = if self.phone_digits.len() == country.phone_length {
                None
            } else {
                Some(validation_message(country.phone_length))
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softpoint_client::Catalog;

    fn country(key: &str, id: &str, name: &str, code: &str, len: usize) -> Country {
        Country {
            id: id.into(),
            name: name.into(),
            calling_code: code.into(),
            phone_length: len,
            country_key: key.into(),
        }
    }

    fn test_catalog() -> Catalog {
        Catalog::from_countries([
            country("US", "236", "United States", "+1", 10),
            country("GB", "235", "United Kingdom", "+44", 10),
            country("SG", "197", "Singapore", "+65", 8),
            country("FR", "74", "France", "+33", 9),
        ])
    }

    fn loaded_form() -> EnrollmentForm {
        let mut form = EnrollmentForm::new();
        form.load_catalog(&test_catalog());
        form
    }

    #[test]
    fn test_starts_idle() {
        let form = EnrollmentForm::new();
        assert_eq!(form.phase(), Phase::Idle);
        assert!(form.selected().is_none());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_load_selects_default_and_sorts() {
        let form = loaded_form();
        assert_eq!(form.phase(), Phase::Ready);
        assert_eq!(form.selected().unwrap().name, "United States");
        assert_eq!(form.required_digits(), Some(10));

        let names: Vec<&str> = form
            .visible_countries()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["France", "Singapore", "United Kingdom", "United States"]
        );
    }

    #[test]
    fn test_load_empty_catalog_stays_idle() {
        let mut form = EnrollmentForm::new();
        form.load_catalog(&Catalog::default());
        assert_eq!(form.phase(), Phase::Idle);
        assert!(form.selected().is_none());
    }

    #[test]
    fn test_every_pick_sets_required_digits() {
        let mut form = loaded_form();
        let countries = form.visible_countries().to_vec();

        for (i, country) in countries.iter().enumerate() {
            form.open_dropdown();
            form.pick(i).unwrap();
            assert_eq!(form.required_digits(), Some(country.phone_length));
            assert!(!form.dropdown_open());
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut form = loaded_form();
        form.search("uni");

        assert_eq!(form.phase(), Phase::Filtered);
        let names: Vec<&str> = form
            .visible_countries()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["United Kingdom", "United States"]);

        form.search("SINGAP");
        let names: Vec<&str> = form
            .visible_countries()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["Singapore"]);
    }

    #[test]
    fn test_empty_search_restores_full_sorted_list() {
        let mut form = loaded_form();
        form.search("uni");
        assert_eq!(form.visible_countries().len(), 2);

        form.search("");
        assert_eq!(form.phase(), Phase::Browsing);
        let names: Vec<&str> = form
            .visible_countries()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["France", "Singapore", "United Kingdom", "United States"]
        );
    }

    #[test]
    fn test_search_with_no_matches_makes_pick_fail() {
        let mut form = loaded_form();
        form.search("zzz");
        assert!(form.visible_countries().is_empty());
        assert_eq!(form.pick(0), Err(FormError::InvalidSelection(0)));
    }

    #[test]
    fn test_closing_the_dropdown_keeps_the_filter() {
        let mut form = loaded_form();
        form.search("uni");
        form.close_dropdown();

        assert_eq!(form.phase(), Phase::Ready);
        assert_eq!(form.search_term(), "uni");

        form.open_dropdown();
        assert_eq!(form.phase(), Phase::Filtered);
        assert_eq!(form.visible_countries().len(), 2);
    }

    #[test]
    fn test_phone_input_strips_formats_and_validates() {
        let mut form = loaded_form();

        form.phone_input("(415) 555-12");
        assert_eq!(form.phone_digits(), "41555512");
        assert_eq!(form.phone_display(), "(415) 555-12");
        assert!(!form.is_valid());
        assert_eq!(form.error_message(), Some("Please enter 10 digits"));

        form.phone_input("4155551234");
        assert_eq!(form.phone_display(), "(415) 555-1234");
        assert!(form.is_valid());
        assert!(form.error_message().is_none());
    }

    #[test]
    fn test_validity_is_exact_length_match() {
        let mut form = loaded_form();

        for digits in ["", "415", "415555123", "41555512345"] {
            form.phone_input(digits);
            assert!(!form.is_valid(), "digits {:?}", digits);
        }

        form.phone_input("4155551234");
        assert!(form.is_valid());
    }

    #[test]
    fn test_picking_shorter_country_invalidates_current_digits() {
        let mut form = loaded_form();
        form.phone_input("4155551234");
        assert!(form.is_valid());

        // Singapore requires 8 digits
        form.search("sing");
        form.pick(0).unwrap();

        assert!(!form.is_valid());
        assert_eq!(form.error_message(), Some("Please enter 8 digits"));
        assert_eq!(form.phone_digits(), "4155551234");
    }

    #[test]
    fn test_phone_input_without_selection_keeps_digits_quietly() {
        let mut form = EnrollmentForm::new();
        form.phone_input("12345");

        assert_eq!(form.phone_digits(), "12345");
        assert!(!form.is_valid());
        assert!(form.error_message().is_none());
    }

    #[test]
    fn test_begin_submit_guards() {
        let mut form = EnrollmentForm::new();
        assert_eq!(form.begin_submit(), Err(FormError::NoCountrySelected));

        let mut form = loaded_form();
        assert_eq!(form.begin_submit(), Err(FormError::EmptyPhoneNumber));

        form.phone_input("4155551234");
        let request = form.begin_submit().unwrap();
        assert_eq!(request.phone_number, "4155551234");
        assert_eq!(request.country_id, "236");
        assert_eq!(form.phase(), Phase::Submitting);

        assert_eq!(form.begin_submit(), Err(FormError::SubmissionInFlight));
    }

    #[test]
    fn test_complete_submit_resets_to_default() {
        let mut form = loaded_form();
        form.search("sing");
        form.pick(0).unwrap();
        form.phone_input("12345678");
        form.begin_submit().unwrap();

        form.complete_submit();

        assert_eq!(form.phase(), Phase::Ready);
        assert_eq!(form.selected().unwrap().name, "United States");
        assert_eq!(form.phone_digits(), "");
        assert_eq!(form.phone_display(), "");
        assert_eq!(form.search_term(), "");
        assert!(form.error_message().is_none());
        assert_eq!(form.visible_countries().len(), 4);
    }

    #[test]
    fn test_reset_default_ignores_the_old_filter() {
        // Submitting from a filtered view must not lose the default:
        // the reset rule runs against the full catalog.
        let mut form = loaded_form();
        form.search("sing");
        form.pick(0).unwrap();
        form.phone_input("12345678");
        form.begin_submit().unwrap();

        form.complete_submit();
        assert_eq!(form.selected().unwrap().name, "United States");
    }

    #[test]
    fn test_abort_submit_leaves_state_unchanged() {
        let mut form = loaded_form();
        form.search("sing");
        form.pick(0).unwrap();
        form.phone_input("12345678");
        form.begin_submit().unwrap();

        form.abort_submit();

        assert_eq!(form.selected().unwrap().name, "Singapore");
        assert_eq!(form.phone_digits(), "12345678");
        assert_eq!(form.search_term(), "sing");
        assert!(form.is_valid());
        assert_ne!(form.phase(), Phase::Submitting);

        // Retry is possible
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn test_default_falls_back_alphabetically() {
        let mut form = EnrollmentForm::new();
        form.load_catalog(&Catalog::from_countries([
            country("SG", "197", "Singapore", "+65", 8),
            country("FR", "74", "France", "+33", 9),
        ]));
        assert_eq!(form.selected().unwrap().name, "France");
    }
}
