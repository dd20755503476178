//! Card content and colour resolution.

use crate::model::person::{Gender, Person};
use crate::settings::Settings;

/// Card background category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardColor {
    /// Spouse whose surname differs from the partner's.
    MixedFamily,
    Male,
    Female,
    /// Non-root generation without a gender colour.
    Descendant,
    Neutral,
}

impl CardColor {
    /// Default fill colour as `#rrggbb`.
    pub fn hex(self) -> &'static str {
        match self {
            Self::MixedFamily => "#d4f7c5",
            Self::Male => "#d9ecff",
            Self::Female => "#ffe0f2",
            Self::Descendant => "#fff7c2",
            Self::Neutral => "#ffffff",
        }
    }
}

/// Position of a card inside its couple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardRole {
    /// The node's own person; carries the collapse toggle.
    Primary,
    /// The resolved spouse shown beside the primary card.
    Spouse,
}

/// Resolves a card colour.
///
/// Order: spouse surname mismatch, then gender, then depth, then neutral.
/// The surname check only applies to spouse cards with a resolved partner
/// and needs both surnames to be non-empty.
pub fn resolve_card_color(
    person: &Person,
    depth: usize,
    role: CardRole,
    partner: Option<&Person>,
) -> CardColor {
    if role == CardRole::Spouse {
        if let Some(partner) = partner {
            let own = person.surname();
            let other = partner.surname();
            if !own.is_empty() && !other.is_empty() && own != other {
                return CardColor::MixedFamily;
            }
        }
    }
    match person.gender {
        Some(Gender::Male) => return CardColor::Male,
        Some(Gender::Female) => return CardColor::Female,
        Some(Gender::Other) | None => {}
    }
    if depth > 0 {
        return CardColor::Descendant;
    }
    CardColor::Neutral
}

/// Which optional lines a card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardOptions {
    pub show_birth: bool,
    pub show_death: bool,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            show_birth: true,
            show_death: true,
        }
    }
}

impl CardOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            show_birth: settings.tree_display.show_birth_year,
            show_death: settings.tree_display.show_death_year,
        }
    }
}

/// Text lines shown on one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContent {
    /// Display name, `Unknown` when blank.
    pub name: String,
    pub birth: Option<String>,
    pub death: Option<String>,
    pub location: Option<String>,
    /// Image URL; `None` renders the placeholder.
    pub image: Option<String>,
}

pub fn card_content(person: &Person, options: &CardOptions) -> CardContent {
    let name = person.display_name();
    CardContent {
        name: if name.is_empty() {
            "Unknown".to_string()
        } else {
            name
        },
        birth: options.show_birth.then(|| person.birth_label()).flatten(),
        death: options.show_death.then(|| person.death_label()).flatten(),
        location: person
            .location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .map(str::to_string),
        image: person.image.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{card_content, resolve_card_color, CardColor, CardOptions, CardRole};
    use crate::model::person::{Gender, Person};

    fn named(id: &str, name: &str, gender: Option<Gender>) -> Person {
        let mut person = Person::with_id(id, "", "");
        person.name = name.to_string();
        person.gender = gender;
        person
    }

    #[test]
    fn surname_mismatch_wins_for_spouse_cards() {
        let husband = named("h", "Dinesh Karki", Some(Gender::Male));
        let wife = named("w", "Laxmi Shrestha", Some(Gender::Female));
        assert_eq!(
            resolve_card_color(&wife, 1, CardRole::Spouse, Some(&husband)),
            CardColor::MixedFamily
        );
        assert_eq!(
            resolve_card_color(&husband, 1, CardRole::Primary, Some(&wife)),
            CardColor::Male
        );
    }

    #[test]
    fn gender_beats_depth_and_depth_beats_default() {
        let other = named("o", "Sam", Some(Gender::Other));
        assert_eq!(
            resolve_card_color(&other, 2, CardRole::Primary, None),
            CardColor::Descendant
        );
        assert_eq!(
            resolve_card_color(&other, 0, CardRole::Primary, None),
            CardColor::Neutral
        );
        let female = named("f", "Isha", Some(Gender::Female));
        assert_eq!(
            resolve_card_color(&female, 3, CardRole::Primary, None),
            CardColor::Female
        );
    }

    #[test]
    fn same_surname_spouse_falls_through_to_gender() {
        let a = named("a", "Manoj Shrestha", Some(Gender::Male));
        let b = named("b", "Sunita Shrestha", None);
        assert_eq!(
            resolve_card_color(&b, 0, CardRole::Spouse, Some(&a)),
            CardColor::Neutral
        );
    }

    #[test]
    fn content_uses_labels_and_placeholders() {
        let mut person = named("p", " ", None);
        person.birth_year = Some(1940);
        person.death_date = Some("2001-03-04".to_string());
        person.location = Some("  ".to_string());
        let content = card_content(&person, &CardOptions::default());
        assert_eq!(content.name, "Unknown");
        assert_eq!(content.birth.as_deref(), Some("b. 1940"));
        assert_eq!(content.death.as_deref(), Some("2001-03-04"));
        assert_eq!(content.location, None);

        let hidden = card_content(
            &person,
            &CardOptions {
                show_birth: false,
                show_death: true,
            },
        );
        assert_eq!(hidden.birth, None);
    }
}
