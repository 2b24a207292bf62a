//! Follow graph
//!
//! Directed edges `user -> followed_user`, unique per pair. The graph only
//! ever gains or loses edges; nothing else about an edge changes.

use booksblog_db::{DbResult, is_unique_violation};
use sqlx::SqlitePool;

use super::user::User;
use crate::apps::accounts::errors::FollowError;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserFollows {
	pub id: i64,
	/// Follower
	pub user_id: i64,
	pub followed_user_id: i64,
}

impl UserFollows {
	/// Add the edge `follower -> target`.
	pub async fn follow(
		pool: &SqlitePool,
		follower: &User,
		target: &User,
	) -> Result<UserFollows, FollowError> {
		if follower.id == target.id {
			return Err(FollowError::SelfFollow);
		}
		if Self::is_following(pool, follower.id, target.id).await? {
			return Err(FollowError::AlreadyFollowing);
		}

		let id: i64 = sqlx::query_scalar(
			"INSERT INTO auth_userfollows (user_id, followed_user_id) VALUES (?1, ?2) RETURNING id",
		)
		.bind(follower.id)
		.bind(target.id)
		.fetch_one(pool)
		.await
		.map_err(|e| {
			// Lost a race with an identical request.
			if is_unique_violation(&e) {
				FollowError::AlreadyFollowing
			} else {
				FollowError::Database(e.into())
			}
		})?;

		tracing::info!(follower = %follower.username, followed = %target.username, "follow added");
		Ok(UserFollows {
			id,
			user_id: follower.id,
			followed_user_id: target.id,
		})
	}

	/// Remove the edge `follower -> target`. Returns whether an edge existed;
	/// a missing edge is not an error.
	pub async fn unfollow(
		pool: &SqlitePool,
		follower: &User,
		target: &User,
	) -> Result<bool, FollowError> {
		if follower.id == target.id {
			return Err(FollowError::SelfUnfollow);
		}

		let result =
			sqlx::query("DELETE FROM auth_userfollows WHERE user_id = ?1 AND followed_user_id = ?2")
				.bind(follower.id)
				.bind(target.id)
				.execute(pool)
				.await
				.map_err(|e| FollowError::Database(e.into()))?;

		let removed = result.rows_affected() > 0;
		tracing::info!(
			follower = %follower.username,
			followed = %target.username,
			removed,
			"follow removed"
		);
		Ok(removed)
	}

	pub async fn is_following(
		pool: &SqlitePool,
		follower_id: i64,
		followed_id: i64,
	) -> DbResult<bool> {
		let count: i64 = sqlx::query_scalar(
			"SELECT COUNT(*) FROM auth_userfollows WHERE user_id = ?1 AND followed_user_id = ?2",
		)
		.bind(follower_id)
		.bind(followed_id)
		.fetch_one(pool)
		.await?;
		Ok(count > 0)
	}

	/// Usernames `user` follows, sorted.
	pub async fn list_following(pool: &SqlitePool, user: &User) -> DbResult<Vec<String>> {
		let usernames = sqlx::query_scalar(
			"SELECT u.username FROM auth_userfollows f \
			 JOIN auth_user u ON u.id = f.followed_user_id \
			 WHERE f.user_id = ?1 ORDER BY u.username",
		)
		.bind(user.id)
		.fetch_all(pool)
		.await?;
		Ok(usernames)
	}

	/// Usernames following `user`, sorted.
	pub async fn list_followers(pool: &SqlitePool, user: &User) -> DbResult<Vec<String>> {
		let usernames = sqlx::query_scalar(
			"SELECT u.username FROM auth_userfollows f \
			 JOIN auth_user u ON u.id = f.user_id \
			 WHERE f.followed_user_id = ?1 ORDER BY u.username",
		)
		.bind(user.id)
		.fetch_all(pool)
		.await?;
		Ok(usernames)
	}
}
