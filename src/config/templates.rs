//! Page templates, compiled into the binary.

use booksblog_template::{TemplateError, TeraRenderer};

const TEMPLATES: &[(&str, &str)] = &[
	("base.html", include_str!("../../templates/base.html")),
	("accounts/login.html", include_str!("../../templates/accounts/login.html")),
	("accounts/signup.html", include_str!("../../templates/accounts/signup.html")),
	("blog/_form_errors.html", include_str!("../../templates/blog/_form_errors.html")),
	("blog/_ticket.html", include_str!("../../templates/blog/_ticket.html")),
	("blog/_review.html", include_str!("../../templates/blog/_review.html")),
	("blog/_feed.html", include_str!("../../templates/blog/_feed.html")),
	("blog/home.html", include_str!("../../templates/blog/home.html")),
	("blog/posts.html", include_str!("../../templates/blog/posts.html")),
	("blog/ticket_form.html", include_str!("../../templates/blog/ticket_form.html")),
	("blog/ticket_edit.html", include_str!("../../templates/blog/ticket_edit.html")),
	("blog/ticket_delete.html", include_str!("../../templates/blog/ticket_delete.html")),
	(
		"blog/ticket_and_review_create.html",
		include_str!("../../templates/blog/ticket_and_review_create.html"),
	),
	("blog/review_create.html", include_str!("../../templates/blog/review_create.html")),
	("blog/review_edit.html", include_str!("../../templates/blog/review_edit.html")),
	("blog/review_delete.html", include_str!("../../templates/blog/review_delete.html")),
	("accounts/subscribe.html", include_str!("../../templates/accounts/subscribe.html")),
];

pub fn renderer() -> Result<TeraRenderer, TemplateError> {
	TeraRenderer::from_raw_templates(TEMPLATES)
}
