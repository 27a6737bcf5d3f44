//! Calculation history repository.

use fiscus_core::calculator::{CalculationInput, CalculationResult};
use fiscus_shared::types::{CalculationId, PageRequest, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use thiserror::Error;

use crate::entities::calculations;

/// Errors that can occur during history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Calculation not found, or not owned by the caller.
    #[error("Calculation {0} not found")]
    NotFound(CalculationId),

    /// Input or result could not be turned into JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// A calculation ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalculation {
    /// Owner, when the request carried a valid token.
    pub user_id: Option<UserId>,
    /// Wire name of the calculation type.
    pub calculation_type: String,
    /// Resolved parameters, defaults included.
    pub parameters: serde_json::Value,
    /// Full result.
    pub result: serde_json::Value,
    /// Free-text note from the caller.
    pub description: Option<String>,
}

impl NewCalculation {
    /// Builds a record from a computed calculation.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Serialization` if either side cannot be encoded.
    pub fn from_outcome(
        user_id: Option<UserId>,
        input: &CalculationInput,
        result: &CalculationResult,
        description: Option<String>,
    ) -> Result<Self, HistoryError> {
        Ok(Self {
            user_id,
            calculation_type: input.calculation_type().as_str().to_string(),
            parameters: serde_json::to_value(input)?,
            result: serde_json::to_value(result)?,
            description,
        })
    }
}

/// Repository for calculation history.
#[derive(Debug, Clone)]
pub struct CalculationRepository {
    db: DatabaseConnection,
}

impl CalculationRepository {
    /// Creates a new calculation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a calculation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn record(
        &self,
        calculation: NewCalculation,
    ) -> Result<calculations::Model, HistoryError> {
        let row = calculations::ActiveModel {
            id: Set(CalculationId::new().into_inner()),
            user_id: Set(calculation.user_id.map(UserId::into_inner)),
            calculation_type: Set(calculation.calculation_type),
            parameters: Set(calculation.parameters),
            result: Set(calculation.result),
            description: Set(calculation.description),
            created_at: Set(chrono::Utc::now().into()),
        };

        let model = row.insert(&self.db).await?;
        tracing::debug!(
            calculation_id = %model.id,
            calculation_type = %model.calculation_type,
            "Calculation recorded"
        );
        Ok(model)
    }

    /// Lists a user's calculations, newest first.
    ///
    /// Returns the requested page and the total number of the user's records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<(Vec<calculations::Model>, u64), HistoryError> {
        let page = page.normalized();
        let paginator = calculations::Entity::find()
            .filter(calculations::Column::UserId.eq(user_id.into_inner()))
            .order_by_desc(calculations::Column::CreatedAt)
            .order_by_desc(calculations::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await?;
        Ok((items, total))
    }

    /// Finds a calculation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: CalculationId,
    ) -> Result<Option<calculations::Model>, HistoryError> {
        Ok(calculations::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Finds a calculation owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::NotFound` if the record is missing or owned by
    /// someone else.
    pub async fn get_for_user(
        &self,
        id: CalculationId,
        user_id: UserId,
    ) -> Result<calculations::Model, HistoryError> {
        self.find_by_id(id)
            .await?
            .filter(|model| model.user_id == Some(user_id.into_inner()))
            .ok_or(HistoryError::NotFound(id))
    }

    /// Deletes a calculation owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::NotFound` if nothing was deleted.
    pub async fn delete(&self, id: CalculationId, user_id: UserId) -> Result<(), HistoryError> {
        let outcome = calculations::Entity::delete_many()
            .filter(calculations::Column::Id.eq(id.into_inner()))
            .filter(calculations::Column::UserId.eq(user_id.into_inner()))
            .exec(&self.db)
            .await?;

        if outcome.rows_affected == 0 {
            return Err(HistoryError::NotFound(id));
        }
        tracing::debug!(calculation_id = %id, "Calculation deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscus_core::calculator::{CalculatorService, parse_input};
    use serde_json::json;

    #[test]
    fn test_new_calculation_from_outcome() {
        let params = json!({"principal": "1000", "rate": 5, "time": 2});
        let input = parse_input("SIMPLE_INTEREST", params.as_object().unwrap()).unwrap();
        let result = CalculatorService::default().calculate(&input).unwrap();
        let user = UserId::new();

        let record =
            NewCalculation::from_outcome(Some(user), &input, &result, Some("teste".into()))
                .unwrap();

        assert_eq!(record.user_id, Some(user));
        assert_eq!(record.calculation_type, "SIMPLE_INTEREST");
        assert_eq!(record.parameters["principal"], "1000");
        assert!(record.result["total"].as_str().unwrap().starts_with("1100"));
        assert_eq!(record.result["breakdown"].as_array().unwrap().len(), 3);
        assert_eq!(record.description.as_deref(), Some("teste"));
    }
}
