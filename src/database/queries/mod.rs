
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::models::{ChatMessage, Company, NewCompany, NewUser, User};

pub struct UserQueries;

impl UserQueries {
    #[inline]
    pub async fn create(pool: &SqlitePool, new_user: NewUser) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            email: new_user.email,
            about: new_user.about,
            calendar: new_user.calendar,
            created_date: Utc::now().naive_utc(),
        };

        sqlx::query(
            "INSERT INTO users (id, name, email, about, calendar, created_date) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.about)
        .bind(&user.calendar)
        .bind(user.created_date)
        .execute(pool)
        .await
        .context("Failed to create user")?;

        debug!("Created user {}", user.id);
        Ok(user)
    }

    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, about, calendar, created_date \
             FROM users ORDER BY created_date",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list users")
    }

    /// Linear scan by email. Uniqueness is a convention, not a constraint:
    /// nothing guards the gap between this check and a subsequent write.
    #[inline]
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, about, calendar, created_date \
             FROM users WHERE email = ? LIMIT 1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to look up user by email")
    }
}

pub struct CompanyQueries;

impl CompanyQueries {
    #[inline]
    pub async fn create(pool: &SqlitePool, new_company: NewCompany) -> Result<Company> {
        let company = Company {
            id: Uuid::new_v4().to_string(),
            company_name: new_company.company_name,
            employer_email: new_company.employer_email,
            industry: new_company.industry,
            number_of_workers: new_company.number_of_workers,
            bot_name: new_company.bot_name,
            core_values: new_company.core_values,
            bot_tone: new_company.bot_tone,
            bot_personality: new_company.bot_personality,
            created_date: Utc::now().naive_utc(),
        };

        sqlx::query(
            "INSERT INTO companies (id, company_name, employer_email, industry, \
             number_of_workers, bot_name, core_values, bot_tone, bot_personality, \
             created_date) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&company.id)
        .bind(&company.company_name)
        .bind(&company.employer_email)
        .bind(&company.industry)
        .bind(company.number_of_workers)
        .bind(&company.bot_name)
        .bind(&company.core_values)
        .bind(&company.bot_tone)
        .bind(&company.bot_personality)
        .bind(company.created_date)
        .execute(pool)
        .await
        .context("Failed to create company")?;

        debug!("Created company {}", company.id);
        Ok(company)
    }

    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Company>> {
        sqlx::query_as::<_, Company>(
            "SELECT id, company_name, employer_email, industry, number_of_workers, \
             bot_name, core_values, bot_tone, bot_personality, created_date \
             FROM companies ORDER BY created_date",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list companies")
    }

    #[inline]
    pub async fn find_by_employer_email(
        pool: &SqlitePool,
        employer_email: &str,
    ) -> Result<Option<Company>> {
        sqlx::query_as::<_, Company>(
            "SELECT id, company_name, employer_email, industry, number_of_workers, \
             bot_name, core_values, bot_tone, bot_personality, created_date \
             FROM companies WHERE employer_email = ? LIMIT 1",
        )
        .bind(employer_email)
        .fetch_optional(pool)
        .await
        .context("Failed to look up company by employer email")
    }
}

pub struct ChatQueries;

impl ChatQueries {
    #[inline]
    pub async fn create(pool: &SqlitePool, message: &str) -> Result<ChatMessage> {
        let chat = ChatMessage {
            id: Uuid::new_v4().to_string(),
            message: message.to_string(),
            created_date: Utc::now().naive_utc(),
        };

        sqlx::query("INSERT INTO chats (id, message, created_date) VALUES (?, ?, ?)")
            .bind(&chat.id)
            .bind(&chat.message)
            .bind(chat.created_date)
            .execute(pool)
            .await
            .context("Failed to record chat message")?;

        Ok(chat)
    }

    /// Full transcript in insertion order.
    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<ChatMessage>> {
        sqlx::query_as::<_, ChatMessage>(
            "SELECT id, message, created_date FROM chats ORDER BY created_date",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list chat messages")
    }
}
