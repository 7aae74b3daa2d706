use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres};
use tracing::{debug, info};

/// Schema statements, applied in order. Each one is idempotent so the whole
/// list can run on every start.
const STATEMENTS: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            name TEXT NULL,
            email VARCHAR(320) NOT NULL,
            role VARCHAR(16) NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            last_signed_in TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "volunteers",
        r#"
        CREATE TABLE IF NOT EXISTS volunteers (
            id INTEGER GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            full_name VARCHAR(255) NOT NULL,
            email VARCHAR(320) NOT NULL,
            phone VARCHAR(20) NOT NULL,
            specialization VARCHAR(255) NOT NULL,
            professional_registration VARCHAR(100) NOT NULL,
            project VARCHAR(32) NOT NULL
                CHECK (project IN ('borahae_terapias', 'purple_army')),
            service_type VARCHAR(32) NOT NULL
                CHECK (service_type IN ('gratuito', 'valor_social', 'ambos')),
            modality VARCHAR(32) NOT NULL
                CHECK (modality IN ('online', 'presencial')),
            session_duration INTEGER NOT NULL DEFAULT 50 CHECK (session_duration > 0),
            frequency VARCHAR(32) NOT NULL
                CHECK (frequency IN ('semanal', 'quinzenal', 'pontual')),
            notes TEXT NULL,
            address TEXT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pendente'
                CHECK (status IN ('ativo', 'inativo', 'pendente')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "volunteer_availability",
        r#"
        CREATE TABLE IF NOT EXISTS volunteer_availability (
            id INTEGER GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            volunteer_id INTEGER NOT NULL REFERENCES volunteers(id) ON DELETE CASCADE,
            day_of_week INTEGER NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "idx_volunteer_availability_volunteer_id",
        "CREATE INDEX IF NOT EXISTS idx_volunteer_availability_volunteer_id ON volunteer_availability(volunteer_id)",
    ),
    (
        "idx_volunteers_email",
        "CREATE INDEX IF NOT EXISTS idx_volunteers_email ON volunteers(email)",
    ),
    (
        "idx_volunteers_status",
        "CREATE INDEX IF NOT EXISTS idx_volunteers_status ON volunteers(status)",
    ),
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for &(name, statement) in STATEMENTS {
        debug!(object = name, "Applying schema statement");
        sqlx::query(statement)
            .execute(pool)
            .await
            .wrap_err_with(|| format!("Failed to create {name}"))?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
