use rstest::rstest;

use super::errors::{AccountError, FollowError};
use super::models::{NewUser, User, UserFollows};
use crate::test_utils::{PASSWORD, TestApp, test_app};

// ============================================================================
// Model Tests
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_create_user_hashes_password(#[future] test_app: TestApp) {
	let app = test_app.await;

	let user = app.create_user("ann").await;

	assert_eq!(user.username, "ann");
	assert_ne!(user.password, PASSWORD);
	assert!(user.password.starts_with("$argon2"));
	let loaded = User::get_by_username(app.ctx.db.pool(), "ann").await.unwrap();
	assert_eq!(loaded, Some(user));
}

#[rstest]
#[tokio::test]
async fn test_duplicate_username_is_rejected(#[future] test_app: TestApp) {
	let app = test_app.await;
	app.create_user("ann").await;

	let new_user = NewUser {
		username: "ann".to_string(),
		password: "another password".to_string(),
		..NewUser::default()
	};
	let result = User::create(app.ctx.db.pool(), app.ctx.hasher.as_ref(), &new_user).await;

	assert!(matches!(result, Err(AccountError::UsernameTaken)));
	assert_eq!(app.count("auth_user").await, 1);
}

#[rstest]
#[case("ann", PASSWORD, true)]
#[case("ann", "wrong password", false)]
#[case("nobody", PASSWORD, false)]
#[tokio::test]
async fn test_authenticate(
	#[future] test_app: TestApp,
	#[case] username: &str,
	#[case] password: &str,
	#[case] accepted: bool,
) {
	let app = test_app.await;
	app.create_user("ann").await;

	let result =
		User::authenticate(app.ctx.db.pool(), app.ctx.hasher.as_ref(), username, password).await;

	match result {
		Ok(user) => {
			assert!(accepted);
			assert_eq!(user.username, "ann");
		}
		Err(err) => {
			assert!(!accepted);
			assert!(matches!(err, AccountError::InvalidCredentials));
		}
	}
}

#[rstest]
#[tokio::test]
async fn test_follow_rules(#[future] test_app: TestApp) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let bob = app.create_user("bob").await;
	let pool = app.ctx.db.pool();

	assert!(matches!(
		UserFollows::follow(pool, &ann, &ann).await,
		Err(FollowError::SelfFollow)
	));

	let edge = UserFollows::follow(pool, &ann, &bob).await.unwrap();
	assert_eq!((edge.user_id, edge.followed_user_id), (ann.id, bob.id));

	assert!(matches!(
		UserFollows::follow(pool, &ann, &bob).await,
		Err(FollowError::AlreadyFollowing)
	));
	assert_eq!(app.count("auth_userfollows").await, 1);

	// The reverse edge is independent.
	UserFollows::follow(pool, &bob, &ann).await.unwrap();
	assert_eq!(app.count("auth_userfollows").await, 2);
}

#[rstest]
#[tokio::test]
async fn test_unfollow(#[future] test_app: TestApp) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let bob = app.create_user("bob").await;
	let pool = app.ctx.db.pool();
	app.follow(&ann, &bob).await;

	assert!(UserFollows::unfollow(pool, &ann, &bob).await.unwrap());
	assert!(!UserFollows::unfollow(pool, &ann, &bob).await.unwrap());
	assert!(!UserFollows::is_following(pool, ann.id, bob.id).await.unwrap());
	assert!(matches!(
		UserFollows::unfollow(pool, &ann, &ann).await,
		Err(FollowError::SelfUnfollow)
	));
}

#[rstest]
#[tokio::test]
async fn test_following_and_followers_are_sorted(#[future] test_app: TestApp) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let zoe = app.create_user("zoe").await;
	let bob = app.create_user("bob").await;
	app.follow(&ann, &zoe).await;
	app.follow(&ann, &bob).await;
	app.follow(&zoe, &ann).await;
	app.follow(&bob, &ann).await;

	let pool = app.ctx.db.pool();
	assert_eq!(UserFollows::list_following(pool, &ann).await.unwrap(), ["bob", "zoe"]);
	assert_eq!(UserFollows::list_followers(pool, &ann).await.unwrap(), ["bob", "zoe"]);
	assert_eq!(UserFollows::list_following(pool, &bob).await.unwrap(), ["ann"]);
}

// ============================================================================
// Session View Tests
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_signup_logs_in(#[future] test_app: TestApp) {
	let app = test_app.await;

	let response = app
		.post(
			"/signup/",
			None,
			&[
				("username", "ann"),
				("email", "ann@example.com"),
				("password1", PASSWORD),
				("password2", PASSWORD),
			],
		)
		.await;

	assert_eq!(response.status.as_u16(), 302);
	assert_eq!(response.location(), Some("/home/"));
	let cookie = response.headers.get("set-cookie").unwrap().to_str().unwrap();
	assert!(cookie.starts_with("sessionid="));
	assert_eq!(app.count("auth_session").await, 1);
}

#[rstest]
#[tokio::test]
async fn test_signup_errors_rerender(#[future] test_app: TestApp) {
	let app = test_app.await;
	app.create_user("ann").await;

	let response = app
		.post(
			"/signup/",
			None,
			&[
				("username", "ann"),
				("email", "ann@example.com"),
				("password1", PASSWORD),
				("password2", PASSWORD),
			],
		)
		.await;

	assert_eq!(response.status.as_u16(), 200);
	assert!(response.text().contains("A user with that username already exists."));
	assert_eq!(app.count("auth_user").await, 1);
}

#[rstest]
#[tokio::test]
async fn test_login_honours_next(#[future] test_app: TestApp) {
	let app = test_app.await;
	app.create_user("ann").await;

	let response = app
		.post(
			"/",
			None,
			&[("username", "ann"), ("password", PASSWORD), ("next", "/posts/")],
		)
		.await;

	assert_eq!(response.status.as_u16(), 302);
	assert_eq!(response.location(), Some("/posts/"));
	assert!(response.headers.get("set-cookie").is_some());
}

#[rstest]
#[tokio::test]
async fn test_login_rejects_wrong_password(#[future] test_app: TestApp) {
	let app = test_app.await;
	app.create_user("ann").await;

	let response = app
		.post("/", None, &[("username", "ann"), ("password", "nope")])
		.await;

	assert_eq!(response.status.as_u16(), 200);
	assert!(response.text().contains("Please enter a correct username and password."));
	assert_eq!(app.count("auth_session").await, 0);
}

#[rstest]
#[tokio::test]
async fn test_login_page_redirects_authenticated_user(#[future] test_app: TestApp) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let session = app.login(&ann).await;

	let response = app.get("/", Some(&session)).await;

	assert_eq!(response.location(), Some("/home/"));
}

#[rstest]
#[tokio::test]
async fn test_logout_ends_session(#[future] test_app: TestApp) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let session = app.login(&ann).await;

	let response = app.post("/logout/", Some(&session), &[]).await;

	assert_eq!(response.location(), Some("/"));
	let cookie = response.headers.get("set-cookie").unwrap().to_str().unwrap();
	assert!(cookie.contains("Max-Age=0"));
	assert_eq!(app.count("auth_session").await, 0);

	let response = app.get("/home/", Some(&session)).await;
	assert_eq!(response.location(), Some("/?next=/home/"));
}

// ============================================================================
// Subscription View Tests
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_subscribe_requires_login(#[future] test_app: TestApp) {
	let app = test_app.await;

	let response = app.get("/subscribe/", None).await;

	assert_eq!(response.status.as_u16(), 302);
	assert_eq!(response.location(), Some("/?next=/subscribe/"));
}

#[rstest]
#[tokio::test]
async fn test_subscribe_follows_user(#[future] test_app: TestApp) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let bob = app.create_user("bob").await;
	let session = app.login(&ann).await;

	let response = app
		.post("/subscribe/", Some(&session), &[("username", "bob")])
		.await;

	assert_eq!(response.location(), Some("/subscribe/"));
	assert!(UserFollows::is_following(app.ctx.db.pool(), ann.id, bob.id).await.unwrap());

	let page = app.get("/subscribe/", Some(&session)).await;
	assert_eq!(page.status.as_u16(), 200);
	assert!(page.text().contains("bob"));
}

#[rstest]
#[case("nobody", "The user does not exist.")]
#[case("ann", "You cannot follow yourself.")]
#[case("bob", "You are already following this user.")]
#[tokio::test]
async fn test_subscribe_field_errors(
	#[future] test_app: TestApp,
	#[case] username: &str,
	#[case] message: &str,
) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let bob = app.create_user("bob").await;
	app.follow(&ann, &bob).await;
	let session = app.login(&ann).await;

	let response = app
		.post("/subscribe/", Some(&session), &[("username", username)])
		.await;

	assert_eq!(response.status.as_u16(), 200);
	assert!(response.text().contains(message));
	assert_eq!(app.count("auth_userfollows").await, 1);
}

#[rstest]
#[tokio::test]
async fn test_unsubscribe_sets_flash(#[future] test_app: TestApp) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let bob = app.create_user("bob").await;
	app.follow(&ann, &bob).await;
	let session = app.login(&ann).await;

	let response = app
		.post("/unsubscribe/", Some(&session), &[("unfollow_username", "bob")])
		.await;

	assert_eq!(response.location(), Some("/subscribe/"));
	assert_eq!(app.count("auth_userfollows").await, 0);

	let page = app.get("/subscribe/", Some(&session)).await;
	assert!(page.text().contains("You unsubscribed from bob."));
	// Shown once.
	let page = app.get("/subscribe/", Some(&session)).await;
	assert!(!page.text().contains("You unsubscribed from bob."));
}

#[rstest]
#[tokio::test]
async fn test_unsubscribe_unknown_user(#[future] test_app: TestApp) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let session = app.login(&ann).await;

	let response = app
		.post("/unsubscribe/", Some(&session), &[("unfollow_username", "ghost")])
		.await;

	assert_eq!(response.location(), Some("/subscribe/"));
	let page = app.get("/subscribe/", Some(&session)).await;
	assert!(page.text().contains("The user does not exist."));
}

#[rstest]
#[tokio::test]
async fn test_unsubscribe_self_is_forbidden(#[future] test_app: TestApp) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let session = app.login(&ann).await;

	let response = app
		.post("/unsubscribe/", Some(&session), &[("unfollow_username", "ann")])
		.await;

	assert_eq!(response.status.as_u16(), 403);
	assert_eq!(response.text(), "You cannot unfollow yourself.");
}

#[rstest]
#[tokio::test]
async fn test_unsubscribe_is_post_only(#[future] test_app: TestApp) {
	let app = test_app.await;
	let ann = app.create_user("ann").await;
	let session = app.login(&ann).await;

	let response = app.get("/unsubscribe/", Some(&session)).await;

	assert_eq!(response.status.as_u16(), 405);
}
