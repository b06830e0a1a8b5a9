//! Results presentation.
//!
//! Stateless: everything here is derived from a `SearchState`.

use std::fmt;

use serde::Serialize;

use crate::search::{HospitalRecommendation, SearchMessage, SearchPhase, SearchState};

/// Display-ready fields of one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalCard {
    /// 1-based position in the service's ranking.
    pub rank: usize,
    pub name: String,
    pub rating: String,
    pub distance: String,
    pub response_time: String,
    pub icu_beds: u32,
    pub blood_units: u32,
    pub explanation: String,
}

impl HospitalCard {
    pub fn new(rank: usize, hospital: &HospitalRecommendation) -> Self {
        Self {
            rank,
            name: hospital.name.clone(),
            rating: format!("{:.1}", hospital.rating),
            distance: format!("{:.1} km", hospital.distance_km),
            response_time: format!("{} min", format_minutes(hospital.response_time_minutes)),
            icu_beds: hospital.icu_beds,
            blood_units: hospital.blood_units,
            explanation: hospital.explanation.trim().to_string(),
        }
    }
}

fn format_minutes(minutes: f64) -> String {
    if minutes.fract() == 0.0 {
        format!("{:.0}", minutes)
    } else {
        format!("{:.1}", minutes)
    }
}

impl fmt::Display for HospitalCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}. {}  ({} / 5)", self.rank, self.name, self.rating)?;
        writeln!(
            f,
            "   Distance: {}  Response: {}  ICU beds: {}  Blood units: {}",
            self.distance, self.response_time, self.icu_beds, self.blood_units
        )?;
        if !self.explanation.is_empty() {
            write!(f, "   \"{}\"", self.explanation)?;
        }
        Ok(())
    }
}

/// What the results area should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "view", content = "content")]
pub enum ResultsView {
    Idle,
    Loading,
    Cards(Vec<HospitalCard>),
    Notice(String),
    Error(String),
}

/// Cards in service order. The ranking is never re-sorted.
pub fn present(hospitals: &[HospitalRecommendation]) -> Vec<HospitalCard> {
    hospitals
        .iter()
        .enumerate()
        .map(|(i, h)| HospitalCard::new(i + 1, h))
        .collect()
}

pub fn render(state: &SearchState) -> ResultsView {
    match state.message() {
        Some(SearchMessage::Error(message)) => return ResultsView::Error(message),
        Some(message @ SearchMessage::NoHospitals) => {
            return ResultsView::Notice(message.text().to_string())
        }
        None => {}
    }
    match state.phase() {
        SearchPhase::Idle => ResultsView::Idle,
        SearchPhase::Loading => ResultsView::Loading,
        SearchPhase::Success | SearchPhase::Error => ResultsView::Cards(present(state.results())),
    }
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsView::Idle => Ok(()),
            ResultsView::Loading => write!(f, "Searching for hospitals..."),
            ResultsView::Notice(text) | ResultsView::Error(text) => write!(f, "{}", text),
            ResultsView::Cards(cards) => {
                for (i, card) in cards.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, "{}", card)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_card_formatting() {
        let mut hospital = fixtures::hospital("City Hospital", 4.26, 3.14159);
        hospital.response_time_minutes = 12.0;
        let card = HospitalCard::new(1, &hospital);

        assert_eq!(card.rating, "4.3");
        assert_eq!(card.distance, "3.1 km");
        assert_eq!(card.response_time, "12 min");
        assert_eq!(card.icu_beds, 8);
    }

    #[test]
    fn test_fractional_minutes() {
        let mut hospital = fixtures::hospital("City Hospital", 4.0, 1.0);
        hospital.response_time_minutes = 7.5;
        assert_eq!(HospitalCard::new(1, &hospital).response_time, "7.5 min");
    }

    #[test]
    fn test_present_keeps_service_order() {
        let cards = present(&fixtures::ranked_hospitals());
        let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["AIIMS Trauma Centre", "Safdarjung Hospital", "Max Super Speciality"]
        );
        assert_eq!(cards[2].rank, 3);
    }

    #[test]
    fn test_render_states() {
        assert_eq!(render(&SearchState::idle()), ResultsView::Idle);
        assert_eq!(render(&SearchState::loading()), ResultsView::Loading);
        assert_eq!(
            render(&SearchState::succeeded(vec![])),
            ResultsView::Notice("No hospitals found. Try another search.".to_string())
        );
        assert_eq!(
            render(&SearchState::failed("Unknown city")),
            ResultsView::Error("Unknown city".to_string())
        );
        assert!(matches!(
            render(&SearchState::succeeded(fixtures::ranked_hospitals())),
            ResultsView::Cards(cards) if cards.len() == 3
        ));
    }

    #[test]
    fn test_card_display_quotes_explanation() {
        let card = HospitalCard::new(2, &fixtures::hospital("Apollo", 4.8, 2.0));
        let text = card.to_string();
        assert!(text.starts_with("2. Apollo  (4.8 / 5)"));
        assert!(text.contains("Distance: 2.0 km"));
        assert!(text.contains("\"Apollo has ICU capacity"));
    }
}
