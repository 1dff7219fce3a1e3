//! Step configuration: one tagged variant per step type.

use crate::validation::ValidationRule;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

step_types! {
    /// The type tag of a step, without its configuration.
    pub enum StepType {
        Intro => "intro",
        Description => "description",
        Text => "text",
        Email => "email",
        Phone => "phone",
        Number => "number",
        LongText => "longText",
        Select => "select",
        MultiSelect => "multiSelect",
        Choice => "choice",
        Checkbox => "checkbox",
        Date => "date",
        DateTime => "dateTime",
        Rating => "rating",
        Ranking => "ranking",
        Address => "address",
        Time => "time",
        Insurance => "insurance",
        Height => "height",
        FileUpload => "fileUpload",
        QuestionsGroup => "questionsGroup",
        SignatureConsent => "signatureConsent",
    }
}

/// Key under which a step stores one of several values.
///
/// ```rust
/// use waypoint::steps::composite_key;
///
/// assert_eq!(composite_key("grp", "q1"), "grp_q1");
/// ```
pub fn composite_key(step_id: &str, field: &str) -> String {
    format!("{step_id}_{field}")
}

/// One step of a wizard.
///
/// The id is the form store key for the step's answer, so it must be unique
/// within a wizard. The kind is fixed at construction.
///
/// Serialized with the kind flattened and tagged by `type`:
///
/// ```rust
/// use waypoint::steps::{StepConfig, StepType};
///
/// let step: StepConfig = serde_json::from_str(
///     r#"{"id": "name", "type": "text", "label": "Your name"}"#,
/// ).unwrap();
/// assert_eq!(step.step_type(), StepType::Text);
/// assert_eq!(step.field().map(|f| f.label.as_str()), Some("Your name"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepConfig {
    id: String,
    #[serde(flatten)]
    kind: StepKind,
}

impl StepConfig {
    pub fn new(id: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn intro(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(
            id,
            StepKind::Intro(IntroStep {
                title: title.into(),
                ..IntroStep::default()
            }),
        )
    }

    pub fn description(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(
            id,
            StepKind::Description(DescriptionStep {
                title: title.into(),
                body: None,
            }),
        )
    }

    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, StepKind::Text(InputStep::labeled(label)))
    }

    pub fn email(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, StepKind::Email(InputStep::labeled(label)))
    }

    pub fn rating(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            id,
            StepKind::Rating(RatingStep {
                field: FieldOptions::labeled(label),
                ..RatingStep::default()
            }),
        )
    }

    pub fn address(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            id,
            StepKind::Address(AddressStep {
                field: FieldOptions::labeled(label),
            }),
        )
    }

    pub fn time(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            id,
            StepKind::Time(TimeStep {
                field: FieldOptions::labeled(label),
                ..TimeStep::default()
            }),
        )
    }

    pub fn questions_group(
        id: impl Into<String>,
        title: impl Into<String>,
        questions: Vec<GroupQuestion>,
    ) -> Self {
        Self::new(
            id,
            StepKind::QuestionsGroup(QuestionsGroupStep {
                title: title.into(),
                description: None,
                questions,
            }),
        )
    }

    pub fn signature_consent(
        id: impl Into<String>,
        title: impl Into<String>,
        consent_text: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            StepKind::SignatureConsent(SignatureConsentStep {
                title: title.into(),
                consent_text: consent_text.into(),
            }),
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    pub fn step_type(&self) -> StepType {
        self.kind.step_type()
    }

    /// Field settings for steps that bind a single input.
    pub fn field(&self) -> Option<&FieldOptions> {
        self.kind.field()
    }
}

/// Per-type step configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StepKind {
    Intro(IntroStep),
    Description(DescriptionStep),
    Text(InputStep),
    Email(InputStep),
    Phone(InputStep),
    Number(NumberStep),
    LongText(InputStep),
    Select(ChoiceStep),
    MultiSelect(ChoiceStep),
    Choice(ChoiceStep),
    Checkbox(ChoiceStep),
    Date(DateStep),
    DateTime(DateStep),
    Rating(RatingStep),
    Ranking(RankingStep),
    Address(AddressStep),
    Time(TimeStep),
    Insurance(InsuranceStep),
    Height(HeightStep),
    FileUpload(FileUploadStep),
    QuestionsGroup(QuestionsGroupStep),
    SignatureConsent(SignatureConsentStep),
}

impl StepKind {
    pub fn step_type(&self) -> StepType {
        match self {
            Self::Intro(_) => StepType::Intro,
            Self::Description(_) => StepType::Description,
            Self::Text(_) => StepType::Text,
            Self::Email(_) => StepType::Email,
            Self::Phone(_) => StepType::Phone,
            Self::Number(_) => StepType::Number,
            Self::LongText(_) => StepType::LongText,
            Self::Select(_) => StepType::Select,
            Self::MultiSelect(_) => StepType::MultiSelect,
            Self::Choice(_) => StepType::Choice,
            Self::Checkbox(_) => StepType::Checkbox,
            Self::Date(_) => StepType::Date,
            Self::DateTime(_) => StepType::DateTime,
            Self::Rating(_) => StepType::Rating,
            Self::Ranking(_) => StepType::Ranking,
            Self::Address(_) => StepType::Address,
            Self::Time(_) => StepType::Time,
            Self::Insurance(_) => StepType::Insurance,
            Self::Height(_) => StepType::Height,
            Self::FileUpload(_) => StepType::FileUpload,
            Self::QuestionsGroup(_) => StepType::QuestionsGroup,
            Self::SignatureConsent(_) => StepType::SignatureConsent,
        }
    }

    pub fn field(&self) -> Option<&FieldOptions> {
        match self {
            Self::Intro(_)
            | Self::Description(_)
            | Self::QuestionsGroup(_)
            | Self::SignatureConsent(_) => None,
            Self::Text(s) | Self::Email(s) | Self::Phone(s) | Self::LongText(s) => Some(&s.field),
            Self::Number(s) => Some(&s.field),
            Self::Select(s) | Self::MultiSelect(s) | Self::Choice(s) | Self::Checkbox(s) => {
                Some(&s.field)
            }
            Self::Date(s) | Self::DateTime(s) => Some(&s.field),
            Self::Rating(s) => Some(&s.field),
            Self::Ranking(s) => Some(&s.field),
            Self::Address(s) => Some(&s.field),
            Self::Time(s) => Some(&s.field),
            Self::Insurance(s) => Some(&s.field),
            Self::Height(s) => Some(&s.field),
            Self::FileUpload(s) => Some(&s.field),
        }
    }
}

/// Settings shared by every step that binds one value.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldOptions {
    pub label: String,
    pub placeholder: Option<String>,
    pub helper_text: Option<String>,
    pub required: bool,
    pub validation: Vec<ValidationRule>,
    pub default_value: Option<Value>,
}

impl FieldOptions {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.validation = rules;
        self
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            label: String::new(),
            placeholder: None,
            helper_text: None,
            required: true,
            validation: Vec::new(),
            default_value: None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntroStep {
    pub title: String,
    pub body: Option<String>,
    pub consent_label: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DescriptionStep {
    pub title: String,
    pub body: Option<String>,
}

/// Free-form input: text, email, phone, long text.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputStep {
    #[serde(flatten)]
    pub field: FieldOptions,
}

impl InputStep {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            field: FieldOptions::labeled(label),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberStep {
    #[serde(flatten)]
    pub field: FieldOptions,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Option lists: select, multi-select, choice, checkbox.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChoiceStep {
    #[serde(flatten)]
    pub field: FieldOptions,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateStep {
    #[serde(flatten)]
    pub field: FieldOptions,
    #[serde(default)]
    pub min_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RatingStep {
    #[serde(flatten)]
    pub field: FieldOptions,
    #[serde(default = "default_rating_max")]
    pub max: u8,
}

fn default_rating_max() -> u8 {
    5
}

impl Default for RatingStep {
    fn default() -> Self {
        Self {
            field: FieldOptions::default(),
            max: default_rating_max(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RankingStep {
    #[serde(flatten)]
    pub field: FieldOptions,
    #[serde(default)]
    pub items: Vec<ChoiceOption>,
}

/// Stored as `{addressLine1, addressLine2, city, state, zipCode}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AddressStep {
    #[serde(flatten)]
    pub field: FieldOptions,
}

/// Stored as `{hour, minute, amPm}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStep {
    #[serde(flatten)]
    pub field: FieldOptions,
    #[serde(default)]
    pub minute_interval: Option<u8>,
}

/// Stored as `{insurer, memberId, planName, planStartDate, relationshipToPolicyOwner}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InsuranceStep {
    #[serde(flatten)]
    pub field: FieldOptions,
    #[serde(default)]
    pub insurers: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeightUnit {
    #[default]
    Imperial,
    Metric,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HeightStep {
    #[serde(flatten)]
    pub field: FieldOptions,
    #[serde(default)]
    pub unit: HeightUnit,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadStep {
    #[serde(flatten)]
    pub field: FieldOptions,
    #[serde(default)]
    pub accept: Vec<String>,
    #[serde(default)]
    pub max_files: Option<usize>,
    #[serde(default)]
    pub max_file_size: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    #[default]
    Text,
    Number,
    Select,
    Choice,
    Date,
}

/// One question of a group, stored under `composite_key(step_id, key)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupQuestion {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

impl GroupQuestion {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: QuestionKind::Text,
            options: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QuestionsGroupStep {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<GroupQuestion>,
}

/// Stores `<id>_consent` (bool) and `<id>_signature`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignatureConsentStep {
    pub title: String,
    pub consent_text: String,
}

impl SignatureConsentStep {
    pub fn consent_key(step_id: &str) -> String {
        composite_key(step_id, "consent")
    }

    pub fn signature_key(step_id: &str) -> String {
        composite_key(step_id, "signature")
    }
}
