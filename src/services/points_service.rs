//! Points assignment by leaders.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::auth::authorization::{DecisionTable, Operation};
use crate::auth::models::Session;
use crate::auth::validation::{parse_id, required_text};
use crate::domain::UserId;
use crate::errors::{Result, StaffdeskError};
use crate::observability::metrics;
use crate::storage::{DbPool, SqlxUserRepository, UserRepository};

/// Points award payload.
///
/// `amount` is kept as raw JSON so numeric strings from older clients can be
/// accepted and so the role check runs before the amount is looked at.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AwardPointsRequest {
    #[serde(alias = "funcionarioId", alias = "funcionario", alias = "employeeId")]
    pub user_id: String,

    #[serde(alias = "pontos")]
    #[schema(value_type = i64, example = 50)]
    pub amount: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointsBalance {
    pub user_id: UserId,
    pub points: i64,
}

#[derive(Clone)]
pub struct PointsService {
    users: Arc<dyn UserRepository>,
    decisions: DecisionTable,
}

impl PointsService {
    pub fn new(users: Arc<dyn UserRepository>, decisions: DecisionTable) -> Self {
        Self { users, decisions }
    }

    pub fn with_sqlx(pool: DbPool, decisions: DecisionTable) -> Self {
        Self::new(Arc::new(SqlxUserRepository::new(pool)), decisions)
    }

    /// Add `amount` to an employee's balance and return the new total.
    ///
    /// Not idempotent: every successful call adds again.
    #[instrument(
        skip(self, session, request),
        fields(leader_id = %session.user_id),
        name = "award_points"
    )]
    pub async fn award_points(
        &self,
        session: &Session,
        request: AwardPointsRequest,
    ) -> Result<PointsBalance> {
        self.decisions.authorize(session, Operation::AwardPoints)?;

        let amount = parse_amount(&request.amount)?;
        let raw_id = required_text(&request.user_id, "userId")?;
        let target: UserId = parse_id(&raw_id, "userId")?;

        let user = self
            .users
            .get_user(&target)
            .await?
            .ok_or_else(|| StaffdeskError::not_found("user", target.as_str()))?;

        if !user.is_employee() {
            return Err(StaffdeskError::validation_field(
                "Points can only be awarded to employees",
                "userId",
            ));
        }

        let points = self.users.add_points(&target, amount).await?.ok_or_else(|| {
            StaffdeskError::validation_field("Points balance would overflow", "amount")
        })?;

        metrics::record_operation(Operation::AwardPoints, "success");
        metrics::record_points_awarded(amount);
        info!(user_id = %target, amount, points, "points awarded");

        Ok(PointsBalance { user_id: target, points })
    }
}

/// Accept a positive whole number, either as a JSON number or a numeric string.
pub fn parse_amount(value: &Value) -> Result<i64> {
    let invalid =
        || StaffdeskError::validation_field("Amount must be a positive whole number", "amount");

    let amount = match value {
        Value::Number(number) => {
            if let Some(n) = number.as_i64() {
                n
            } else if number.is_u64() {
                return Err(invalid());
            } else {
                whole_from_f64(number.as_f64().ok_or_else(invalid)?).ok_or_else(invalid)?
            }
        }
        Value::String(text) => {
            let text = text.trim();
            match text.parse::<i64>() {
                Ok(n) => n,
                Err(_) => {
                    let float = text.parse::<f64>().map_err(|_| invalid())?;
                    whole_from_f64(float).ok_or_else(invalid)?
                }
            }
        }
        _ => return Err(invalid()),
    };

    if amount <= 0 {
        return Err(invalid());
    }
    Ok(amount)
}

fn whole_from_f64(value: f64) -> Option<i64> {
    // 2^63 is the first f64 above i64::MAX
    if !value.is_finite() || value.fract() != 0.0 || value >= 9_223_372_036_854_775_808.0 {
        return None;
    }
    if value < i64::MIN as f64 {
        return None;
    }
    Some(value as i64)
}
