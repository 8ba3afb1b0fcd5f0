//! Initial loan ledger schema.
//!
//! Creates the loan and installment tables plus the four finance ledgers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: LOANS
        // ============================================================
        db.execute_unprepared(LOANS_SQL).await?;
        db.execute_unprepared(LOAN_INSTALLMENTS_SQL).await?;

        // ============================================================
        // PART 2: FINANCE LEDGERS
        // ============================================================
        db.execute_unprepared(PROFITS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(INVESTMENTS_SQL).await?;
        db.execute_unprepared(RESERVE_FUNDS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
DROP TABLE IF EXISTS reserve_funds CASCADE;
DROP TABLE IF EXISTS investments CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS profits CASCADE;
DROP TABLE IF EXISTS loan_installments CASCADE;
DROP TABLE IF EXISTS loans CASCADE;
",
        )
        .await?;
        Ok(())
    }
}

const LOANS_SQL: &str = r"
CREATE TABLE loans (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    phone VARCHAR(32) NOT NULL,
    aadhaar VARCHAR(32),
    pan VARCHAR(32),
    referrer VARCHAR(255),
    loan_amount NUMERIC(19, 4) NOT NULL,
    given_amount NUMERIC(19, 4) NOT NULL,
    per_day_collection NUMERIC(19, 4) NOT NULL,
    days_for_loan INTEGER,
    total_paid_loan NUMERIC(19, 4) NOT NULL DEFAULT 0,
    remaining_loan NUMERIC(19, 4) NOT NULL,
    total_paid_installments INTEGER NOT NULL DEFAULT 0,
    total_due_installments INTEGER NOT NULL DEFAULT 0,
    status VARCHAR(16) NOT NULL DEFAULT 'Open',
    loan_start_date DATE,
    loan_end_date DATE,
    loan_type VARCHAR(16) NOT NULL DEFAULT 'new',
    manual_profit NUMERIC(19, 4),
    cycle INTEGER NOT NULL DEFAULT 1,
    version BIGINT NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_loans_status CHECK (status IN ('Open', 'Closed')),
    CONSTRAINT chk_loans_type CHECK (loan_type IN ('new', 'renew')),
    CONSTRAINT chk_loans_remaining CHECK (remaining_loan >= 0),
    CONSTRAINT chk_loans_cycle CHECK (cycle >= 1)
);

-- Rollover looks up the latest loan per phone
CREATE INDEX idx_loans_phone ON loans(phone, created_at DESC);
CREATE INDEX idx_loans_created ON loans(created_at DESC);
CREATE INDEX idx_loans_status ON loans(status);
";

const LOAN_INSTALLMENTS_SQL: &str = r"
CREATE TABLE loan_installments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    loan_id UUID NOT NULL REFERENCES loans(id) ON DELETE CASCADE,
    sequence INTEGER NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    paid_at TIMESTAMPTZ NOT NULL,
    remaining_after_installment NUMERIC(19, 4) NOT NULL,
    cycle INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_installment_sequence UNIQUE (loan_id, sequence),
    CONSTRAINT chk_installment_amount CHECK (amount > 0)
);
";

const PROFITS_SQL: &str = r"
CREATE TABLE profits (
    id UUID PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    date DATE NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    loan_ref UUID REFERENCES loans(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- NULLs stay distinct, so only linked entries are unique
    CONSTRAINT uq_profits_loan_ref UNIQUE (loan_ref)
);

CREATE INDEX idx_profits_date ON profits(date);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    date DATE NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_expenses_date ON expenses(date);
";

const INVESTMENTS_SQL: &str = r"
CREATE TABLE investments (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    date DATE NOT NULL,
    duration_type VARCHAR(8) NOT NULL,
    duration_value INTEGER NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_investments_duration_type CHECK (duration_type IN ('Month', 'Year')),
    CONSTRAINT chk_investments_duration_value CHECK (duration_value > 0)
);

CREATE INDEX idx_investments_date ON investments(date);
";

const RESERVE_FUNDS_SQL: &str = r"
CREATE TABLE reserve_funds (
    id UUID PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    date DATE NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_reserve_funds_date ON reserve_funds(date);
";
