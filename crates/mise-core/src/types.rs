// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the generation pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::MiseError;

/// Identifier of the user owning a generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Opaque identifier of a persisted generation record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a fresh random record identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Auth,
}

/// The two generation variants offered by the service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Recipe,
    MealPlan,
}

impl GenerationKind {
    /// Error code carried by the terminal error frame for this kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Recipe => "Failed to generate recipe",
            Self::MealPlan => "Failed to generate meal plan",
        }
    }
}

/// Recipe generation parameters as received from the client.
///
/// Every field is optional at the wire level; required ones are checked by
/// [`GenerationRequest::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeParams {
    pub ingredients: Option<String>,
    pub meal_type: Option<String>,
    pub cuisine: Option<String>,
    pub cooking_time: Option<String>,
    pub complexity: Option<String>,
    pub serving_number: Option<String>,
    pub dietary: Option<String>,
}

/// Meal-plan generation parameters (a biometric and dietary profile).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanParams {
    pub age: Option<String>,
    pub goal_and_aspiration: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub sex: Option<String>,
    pub diet: Option<String>,
    pub meal_count_per_day: Option<String>,
    pub any_allergies: Option<String>,
}

/// Parameters of one generation, tagged by variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GenerationParams {
    Recipe(RecipeParams),
    MealPlan(MealPlanParams),
}

impl GenerationParams {
    pub fn kind(&self) -> GenerationKind {
        match self {
            Self::Recipe(_) => GenerationKind::Recipe,
            Self::MealPlan(_) => GenerationKind::MealPlan,
        }
    }

    fn validate(&self) -> Result<(), MiseError> {
        match self {
            Self::Recipe(p) => {
                require(&p.ingredients, "Ingredients")?;
                require(&p.serving_number, "Serving number")?;
            }
            Self::MealPlan(p) => {
                require(&p.age, "Age")?;
                require(&p.goal_and_aspiration, "Goal")?;
                require(&p.weight, "Weight")?;
                require(&p.height, "Height")?;
                require(&p.sex, "Sex")?;
                require(&p.diet, "Diet")?;
                require(&p.meal_count_per_day, "Meals per day")?;
            }
        }
        Ok(())
    }
}

/// Returns the trimmed value when present and non-blank.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn require(value: &Option<String>, field: &'static str) -> Result<(), MiseError> {
    present(value)
        .map(|_| ())
        .ok_or(MiseError::Validation { field })
}

/// A single incoming generation request. Never persisted as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub user_id: Option<String>,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn recipe(user_id: Option<String>, params: RecipeParams) -> Self {
        Self {
            user_id,
            params: GenerationParams::Recipe(params),
        }
    }

    pub fn meal_plan(user_id: Option<String>, params: MealPlanParams) -> Self {
        Self {
            user_id,
            params: GenerationParams::MealPlan(params),
        }
    }

    pub fn kind(&self) -> GenerationKind {
        self.params.kind()
    }

    /// Check that every required parameter is present and return the owner.
    pub fn validate(&self) -> Result<UserId, MiseError> {
        self.params.validate()?;
        present(&self.user_id)
            .map(|id| UserId(id.to_string()))
            .ok_or(MiseError::Validation { field: "User ID" })
    }
}

/// The persisted record of a completed generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub id: RecordId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub params: GenerationParams,
    pub result_text: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl GenerationResult {
    pub fn kind(&self) -> GenerationKind {
        self.params.kind()
    }
}

/// One discrete unit of the outbound event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A slice of the generated text.
    Chunk(String),
    /// Terminal marker sent after the last chunk.
    Close,
    /// Terminal failure marker.
    Error { code: String, details: String },
}

impl Frame {
    /// JSON payload of the frame (`{"chunk":..}`, `{"action":"close"}` or `{"error":..,"details":..}`).
    pub fn to_json(&self) -> String {
        let value = match self {
            Self::Chunk(chunk) => serde_json::json!({ "chunk": chunk }),
            Self::Close => serde_json::json!({ "action": "close" }),
            Self::Error { code, details } => {
                serde_json::json!({ "error": code, "details": details })
            }
        };
        value.to_string()
    }

    /// Text-event wire form: `data: <JSON>\n\n`.
    pub fn to_event_string(&self) -> String {
        format!("data: {}\n\n", self.to_json())
    }
}

/// A prompt handed to a text-generation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub prompt: String,
}

/// The provider's answer; `text` is `None` when the upstream shape carried no text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub text: Option<String>,
    pub model: String,
}

/// A bearer token to be verified.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
}

/// A verified identity from an auth adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: UserId,
    /// Unix timestamp (seconds) after which the token stops being accepted.
    pub expires_at: i64,
}
