//! Postgres implementation of the member repository.
//!
//! Member + skills + links writes are transactional; skills/links updates
//! are delete-all-then-insert, matching the replace-wholesale contract.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domains::member::models::{
    Link, LinkInput, Member, MemberRank, MemberStatus, NewMember, ProfileChanges, Skill,
    SkillInput,
};
use crate::kernel::BaseMemberRepository;

/// Member row without its owned collections.
#[derive(sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    email: String,
    name: String,
    generation: i32,
    rank: MemberRank,
    description: Option<String>,
    image_url: Option<String>,
    status: MemberStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, row: MemberRow) -> Result<Member> {
        let skills = sqlx::query_as::<_, Skill>(
            "SELECT * FROM member_skill WHERE member_id = $1 ORDER BY skill_name",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        let links = sqlx::query_as::<_, Link>(
            "SELECT * FROM member_link WHERE member_id = $1 ORDER BY url",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble(row, skills, links))
    }

    async fn hydrate_all(&self, rows: Vec<MemberRow>) -> Result<Vec<Member>> {
        let mut members = Vec::with_capacity(rows.len());
        for row in rows {
            members.push(self.hydrate(row).await?);
        }
        Ok(members)
    }
}

fn assemble(row: MemberRow, skills: Vec<Skill>, links: Vec<Link>) -> Member {
    Member {
        id: row.id,
        email: row.email,
        name: row.name,
        generation: row.generation,
        rank: row.rank,
        description: row.description,
        image_url: row.image_url,
        status: row.status,
        created_at: row.created_at,
        updated_at: row.updated_at,
        skills,
        links,
    }
}

async fn insert_skills(
    tx: &mut Transaction<'_, Postgres>,
    member_id: Uuid,
    skills: &[SkillInput],
) -> Result<()> {
    for skill in skills {
        sqlx::query("INSERT INTO member_skill (id, member_id, skill_name) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(member_id)
            .bind(&skill.skill_name)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn insert_links(
    tx: &mut Transaction<'_, Postgres>,
    member_id: Uuid,
    links: &[LinkInput],
) -> Result<()> {
    for link in links {
        sqlx::query(
            "INSERT INTO member_link (id, member_id, link_type, url) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(member_id)
        .bind(link.link_type)
        .bind(&link.url)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl BaseMemberRepository for PgMemberRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>("SELECT * FROM member WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>("SELECT * FROM member WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, status: Option<MemberStatus>) -> Result<Vec<Member>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, MemberRow>(
                    "SELECT * FROM member WHERE status = $1 ORDER BY created_at DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MemberRow>("SELECT * FROM member ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        self.hydrate_all(rows).await
    }

    async fn create(&self, new: NewMember) -> Result<Member> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, MemberRow>(
            "INSERT INTO member (id, email, name, generation, rank, description, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.name)
        .bind(new.generation)
        .bind(new.rank)
        .bind(&new.description)
        .bind(MemberStatus::Unverified)
        .fetch_one(&mut *tx)
        .await?;

        insert_skills(&mut tx, row.id, &new.skills).await?;
        insert_links(&mut tx, row.id, &new.links).await?;

        tx.commit().await?;
        self.hydrate(row).await
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Member> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, MemberRow>(
            "UPDATE member
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 image_url = COALESCE($4, image_url),
                 updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.image_url)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(skills) = &changes.skills {
            sqlx::query("DELETE FROM member_skill WHERE member_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_skills(&mut tx, id, skills).await?;
        }

        if let Some(links) = &changes.links {
            sqlx::query("DELETE FROM member_link WHERE member_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_links(&mut tx, id, links).await?;
        }

        tx.commit().await?;
        self.hydrate(row).await
    }

    async fn set_image_url(&self, id: Uuid, image_url: Option<String>) -> Result<Member> {
        let row = sqlx::query_as::<_, MemberRow>(
            "UPDATE member SET image_url = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&image_url)
        .fetch_one(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    async fn transition_status(
        &self,
        id: Uuid,
        expected: MemberStatus,
        next: MemberStatus,
    ) -> Result<Option<Member>> {
        // Conditional write: succeeds only if the status still matches the
        // caller's precondition at commit time
        let row = sqlx::query_as::<_, MemberRow>(
            "UPDATE member
             SET status = $3, updated_at = now()
             WHERE id = $1 AND status = $2
             RETURNING *",
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // Skills and links go with the member (ON DELETE CASCADE)
        sqlx::query("DELETE FROM member WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
