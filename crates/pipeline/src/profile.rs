//! Gift-recipient profile: the structured input both stages consume.
//!
//! Attribute enums carry human-readable labels; [`GiftProfile::render`]
//! produces the markdown profile block that both stage prompts consume.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

// ── Attribute enums ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    Parent,
    Sibling,
    Partner,
    Friend,
    Child,
    Colleague,
    Teacher,
    Other,
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Parent => "Parent",
            Self::Sibling => "Sibling",
            Self::Partner => "Partner",
            Self::Friend => "Friend",
            Self::Child => "Child",
            Self::Colleague => "Colleague",
            Self::Teacher => "Teacher",
            Self::Other => "Other",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Occasion {
    Birthday,
    Anniversary,
    Graduation,
    Wedding,
    Retirement,
    ThankYou,
    Housewarming,
    BabyShower,
    JustBecause,
}

impl Occasion {
    /// Lowercase form used inside the search query.
    pub fn query_term(&self) -> &'static str {
        match self {
            Self::Birthday => "birthday",
            Self::Anniversary => "anniversary",
            Self::Graduation => "graduation",
            Self::Wedding => "wedding",
            Self::Retirement => "retirement",
            Self::ThankYou => "thank you",
            Self::Housewarming => "housewarming",
            Self::BabyShower => "baby shower",
            Self::JustBecause => "just because",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Birthday => "Birthday",
            Self::Anniversary => "Anniversary",
            Self::Graduation => "Graduation",
            Self::Wedding => "Wedding",
            Self::Retirement => "Retirement",
            Self::ThankYou => "Thank You",
            Self::Housewarming => "Housewarming",
            Self::BabyShower => "Baby Shower",
            Self::JustBecause => "Just Because",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interest {
    Books,
    TechGadgets,
    Fashion,
    Fitness,
    FoodAndCooking,
    ArtAndCraft,
    HomeDecor,
    Travel,
    Gaming,
    Pets,
    Wellness,
    Music,
    Hobbies,
}

impl Interest {
    /// Phrase completing "who loves …" in the search query.
    pub fn love_phrase(&self) -> &'static str {
        match self {
            Self::Books => "reading",
            Self::TechGadgets => "tech and gadgets",
            Self::Fashion => "fashion",
            Self::Fitness => "fitness",
            Self::FoodAndCooking => "cooking",
            Self::ArtAndCraft => "arts and crafts",
            Self::HomeDecor => "home decor",
            Self::Travel => "travel",
            Self::Gaming => "gaming",
            Self::Pets => "pets",
            Self::Wellness => "wellness",
            Self::Music => "music",
            Self::Hobbies => "new hobbies",
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Books => "Books",
            Self::TechGadgets => "Tech/Gadgets",
            Self::Fashion => "Fashion",
            Self::Fitness => "Fitness",
            Self::FoodAndCooking => "Food & Cooking",
            Self::ArtAndCraft => "Art & Craft",
            Self::HomeDecor => "Home Decor",
            Self::Travel => "Travel",
            Self::Gaming => "Gaming",
            Self::Pets => "Pets",
            Self::Wellness => "Wellness",
            Self::Music => "Music",
            Self::Hobbies => "Hobbies",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Personality {
    Sentimental,
    Practical,
    Trendy,
    Humorous,
    Creative,
    Adventurous,
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sentimental => "Sentimental",
            Self::Practical => "Practical",
            Self::Trendy => "Trendy",
            Self::Humorous => "Humorous",
            Self::Creative => "Creative",
            Self::Adventurous => "Adventurous",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetRange {
    #[serde(rename = "under-25")]
    Under25,
    #[serde(rename = "25-50")]
    From25To50,
    #[serde(rename = "50-100")]
    From50To100,
    #[serde(rename = "100-200")]
    From100To200,
    #[serde(rename = "200-plus")]
    Over200,
}

impl BudgetRange {
    /// Phrase used inside the search query, e.g. "between $50 and $100".
    pub fn query_phrase(&self) -> &'static str {
        match self {
            Self::Under25 => "under $25",
            Self::From25To50 => "between $25 and $50",
            Self::From50To100 => "between $50 and $100",
            Self::From100To200 => "between $100 and $200",
            Self::Over200 => "over $200",
        }
    }
}

impl fmt::Display for BudgetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Under25 => "Under $25",
            Self::From25To50 => "$25–50",
            Self::From50To100 => "$50–100",
            Self::From100To200 => "$100–200",
            Self::Over200 => "$200+",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GiftStyle {
    Thoughtful,
    Fun,
    Luxury,
    Personalized,
    DiyFriendly,
    Techy,
    SurpriseMe,
}

impl fmt::Display for GiftStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Thoughtful => "Thoughtful",
            Self::Fun => "Fun",
            Self::Luxury => "Luxury",
            Self::Personalized => "Personalized",
            Self::DiyFriendly => "DIY-friendly",
            Self::Techy => "Techy",
            Self::SurpriseMe => "Surprise me",
        };
        write!(f, "{label}")
    }
}

// ── GiftProfile ───────────────────────────────────────────────────────────────

/// Recipient attributes gathered by the caller.  Immutable once constructed;
/// both stages receive it by reference and render it identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftProfile {
    pub age: u32,
    pub relationship: Relationship,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub occasion: Occasion,
    #[serde(default)]
    pub interests: Vec<Interest>,
    #[serde(default)]
    pub personality: Option<Personality>,
    pub budget: BudgetRange,
    #[serde(default)]
    pub gift_style: Option<GiftStyle>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl GiftProfile {
    pub fn validate(&self) -> Result<()> {
        if self.age == 0 {
            return Err(PipelineError::InvalidProfile(
                "recipient age must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// A short recipient phrase for the search query, sharpened by gender
    /// where the relationship supports it (Partner + Female → "wife").
    pub fn recipient_descriptor(&self) -> &'static str {
        match (self.relationship, self.gender) {
            (Relationship::Partner, Some(Gender::Female)) => "wife",
            (Relationship::Partner, Some(Gender::Male)) => "husband",
            (Relationship::Partner, _) => "partner",
            (Relationship::Parent, Some(Gender::Female)) => "mom",
            (Relationship::Parent, Some(Gender::Male)) => "dad",
            (Relationship::Parent, _) => "parents",
            (Relationship::Sibling, Some(Gender::Female)) => "sister",
            (Relationship::Sibling, Some(Gender::Male)) => "brother",
            (Relationship::Sibling, _) => "sibling",
            (Relationship::Child, Some(Gender::Female)) => "daughter",
            (Relationship::Child, Some(Gender::Male)) => "son",
            (Relationship::Child, _) => "kids",
            (Relationship::Friend, _) => "friend",
            (Relationship::Colleague, _) => "coworker",
            (Relationship::Teacher, _) => "teacher",
            (Relationship::Other, _) => "someone special",
        }
    }

    /// The markdown profile block fed to both stage prompts, grouped into
    /// recipient, occasion, and budget sections.
    pub fn render(&self) -> String {
        let gender = self
            .gender
            .map(|g| g.to_string())
            .unwrap_or_else(|| "Prefer not to say".to_string());
        let interests = if self.interests.is_empty() {
            "Not specified".to_string()
        } else {
            self.interests
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let personality = self
            .personality
            .map(|p| p.to_string())
            .unwrap_or_else(|| "Not sure".to_string());
        let gift_style = self
            .gift_style
            .map(|s| s.to_string())
            .unwrap_or_else(|| "No preference".to_string());
        let notes = match self.notes.as_deref().map(str::trim) {
            Some(notes) if !notes.is_empty() => notes.to_string(),
            _ => "None".to_string(),
        };

        format!(
            "**Recipient Info:**\n\
             - Age: {age}\n\
             - Relationship: {relationship}\n\
             - Gender: {gender}\n\
             \n\
             **Occasion & Interests:**\n\
             - Occasion: {occasion}\n\
             - Interests: {interests}\n\
             - Personality: {personality}\n\
             \n\
             **Budget & Style:**\n\
             - Budget: {budget}\n\
             - Gift Style: {gift_style}\n\
             - Notes: {notes}\n",
            age = self.age,
            relationship = self.relationship,
            occasion = self.occasion,
            budget = self.budget,
        )
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GiftProfile {
        GiftProfile {
            age: 30,
            relationship: Relationship::Partner,
            gender: Some(Gender::Female),
            occasion: Occasion::Anniversary,
            interests: vec![Interest::FoodAndCooking],
            personality: Some(Personality::Sentimental),
            budget: BudgetRange::From50To100,
            gift_style: Some(GiftStyle::Thoughtful),
            notes: Some("Avoid perfumes, they already have a Kindle".to_string()),
        }
    }

    #[test]
    fn validate_rejects_zero_age() {
        let mut profile = sample();
        profile.age = 0;
        assert!(matches!(
            profile.validate(),
            Err(PipelineError::InvalidProfile(_))
        ));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn render_contains_all_sections() {
        let rendered = sample().render();
        assert!(rendered.starts_with("**Recipient Info:**"));
        assert!(rendered.contains("- Age: 30"));
        assert!(rendered.contains("- Relationship: Partner"));
        assert!(rendered.contains("**Occasion & Interests:**"));
        assert!(rendered.contains("- Occasion: Anniversary"));
        assert!(rendered.contains("- Interests: Food & Cooking"));
        assert!(rendered.contains("**Budget & Style:**"));
        assert!(rendered.contains("- Budget: $50–100"));
        assert!(rendered.contains("- Notes: Avoid perfumes"));
    }

    #[test]
    fn render_placeholders_for_optional_fields() {
        let profile = GiftProfile {
            age: 8,
            relationship: Relationship::Child,
            gender: None,
            occasion: Occasion::Birthday,
            interests: vec![],
            personality: None,
            budget: BudgetRange::Under25,
            gift_style: None,
            notes: Some("   ".to_string()),
        };
        let rendered = profile.render();
        assert!(rendered.contains("- Gender: Prefer not to say"));
        assert!(rendered.contains("- Interests: Not specified"));
        assert!(rendered.contains("- Personality: Not sure"));
        assert!(rendered.contains("- Gift Style: No preference"));
        assert!(rendered.contains("- Notes: None"));
    }

    #[test]
    fn descriptor_sharpened_by_gender() {
        let mut profile = sample();
        assert_eq!(profile.recipient_descriptor(), "wife");
        profile.gender = Some(Gender::Male);
        assert_eq!(profile.recipient_descriptor(), "husband");
        profile.gender = None;
        assert_eq!(profile.recipient_descriptor(), "partner");
        profile.relationship = Relationship::Teacher;
        assert_eq!(profile.recipient_descriptor(), "teacher");
    }

    #[test]
    fn profile_deserializes_from_toml() {
        let raw = r#"
            age = 30
            relationship = "partner"
            gender = "female"
            occasion = "anniversary"
            interests = ["food-and-cooking", "travel"]
            budget = "50-100"
            gift_style = "thoughtful"
        "#;
        // The CLI loads profiles from TOML files using these field names.
        let profile: GiftProfile = toml::from_str(raw).unwrap();
        assert_eq!(profile.relationship, Relationship::Partner);
        assert_eq!(profile.budget, BudgetRange::From50To100);
        assert_eq!(profile.interests.len(), 2);
        assert!(profile.personality.is_none());
    }
}
