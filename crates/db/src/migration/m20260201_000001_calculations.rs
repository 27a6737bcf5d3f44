//! Calculation history table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CALCULATIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS calculations CASCADE;")
            .await?;
        Ok(())
    }
}

const CALCULATIONS_SQL: &str = r"
-- One row per successful calculation. user_id is NULL for anonymous requests.
CREATE TABLE calculations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID,
    calculation_type VARCHAR(32) NOT NULL,
    parameters JSONB NOT NULL,
    result JSONB NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_calculation_type CHECK (calculation_type IN (
        'SIMPLE_INTEREST', 'COMPOUND_INTEREST', 'LOAN_PAYMENT', 'INVESTMENT_RETURN',
        'TAX_CALCULATION', 'DEPRECIATION', 'SIMPLES_NACIONAL', 'FOLHA_PAGAMENTO',
        'LUCRO_PRESUMIDO'
    ))
);

-- History listing: a user's calculations, newest first
CREATE INDEX idx_calculations_user ON calculations(user_id, created_at DESC)
    WHERE user_id IS NOT NULL;

-- Usage reporting by type
CREATE INDEX idx_calculations_type ON calculations(calculation_type, created_at DESC);
";
