//! End-to-end flows against a scripted repository creation form.
//!
//! The mock DOM below mirrors the forge's markup closely enough that the
//! page object sees the same sequence it would in a browser: the license
//! picker reveals its option list on click, an option click closes the list,
//! and submit navigates to the repository page.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use repoform::prelude::*;
use repoform::{TemplateKind, CREATE_REPOSITORY_TITLE, REQUIRED_FORM_ELEMENTS};

const OPTIONS: &str = "//div[@class='select-menu-item js-navigation-item']/div";
const ADD_LICENSE: &str = "//*[contains(text(), 'Add a license')]";
const SUBMIT: &str = "//*[contains (text(), 'Create repository')]";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("repoform=debug")
        .try_init();
}

/// Selector of a required form element, as declared by the page
fn form_selector(name: &str) -> Selector {
    match name {
        "repository_name" => Selector::id("repository_name"),
        "repository_description" => Selector::id("repository_description"),
        "submit" => Selector::xpath(SUBMIT),
        "owner" => Selector::xpath("//div[contains(@class, 'owner-container')]/span"),
        "visibility_public" => {
            Selector::xpath("//input[@type='radio'][@id='repository_public_true']")
        }
        "visibility_private" => {
            Selector::xpath("//input[@type='radio'][@id='repository_public_false']")
        }
        "auto_init" => Selector::id("repository_auto_init"),
        "add_gitignore" => Selector::xpath("//*[contains(text(), 'Add .gitignore')]"),
        "add_license" => Selector::xpath(ADD_LICENSE),
        other => panic!("no selector for {other}"),
    }
}

/// The creation form; submitting navigates to `repository_title`
fn forge(repository_title: &str, licenses: &[&str]) -> MockSession {
    let session = MockSession::new(CREATE_REPOSITORY_TITLE)
        .with_element(
            MockElement::new(Selector::id("repository_auto_init"))
                .on_click(ClickEffect::ToggleSelected),
        )
        .with_element(
            MockElement::new(Selector::xpath(SUBMIT))
                .on_click(ClickEffect::SetTitle(repository_title.to_string())),
        )
        .with_element(
            MockElement::new(Selector::xpath(ADD_LICENSE))
                .on_click(ClickEffect::Attach(Selector::xpath(OPTIONS))),
        );

    for name in REQUIRED_FORM_ELEMENTS {
        if !session.is_attached(&form_selector(name)) {
            session.add_element(MockElement::new(form_selector(name)));
        }
    }

    // Picking an option closes the list.
    for text in licenses {
        session.add_element(
            MockElement::new(Selector::xpath(OPTIONS))
                .with_text(*text)
                .detached()
                .on_click(ClickEffect::Detach(Selector::xpath(OPTIONS))),
        );
    }
    session
}

#[tokio::test]
async fn test_full_submission_lands_on_repository_page() {
    init_tracing();
    let mut session = forge("octocat/hello-world", &["Apache License 2.0", "MIT License"]);

    let mut form = CreateRepositoryPage::new(&mut session).await.unwrap();
    assert!(form.is_form_present().await.unwrap());

    let request = CreateRepositoryRequest::new(" hello   world ")
        .with_description("Greeting service")
        .with_readme(true)
        .with_license("MIT License");
    let repo = form.create_repository(&request).await.unwrap();
    assert_eq!(repo.repository_name().as_str(), "hello-world");
    assert!(repo.is_displayed().await.unwrap());
    drop(repo);

    let report = form.last_report().unwrap().clone();
    assert!(report.readme_toggled);
    assert!(report.templates_resolved());
    assert_eq!(report.gitignore, TemplateSelection::NotRequested);
    assert_eq!(
        report.license,
        TemplateSelection::Selected {
            requested: "MIT License".to_string(),
            option: "MIT License".to_string(),
        }
    );
    drop(form);

    assert_eq!(session.clicks_on_text("MIT License"), 1);
    assert_eq!(session.clicks_on_text("Apache License 2.0"), 0);
    assert_eq!(session.click_count(&Selector::xpath(ADD_LICENSE)), 1);
    assert_eq!(session.click_count(&Selector::xpath(SUBMIT)), 1);
    assert_eq!(
        session.is_checked(&Selector::id("repository_auto_init")),
        Some(true)
    );
}

#[tokio::test]
async fn test_unavailable_license_still_submits_with_report() {
    init_tracing();
    let mut session = forge("octocat/tools", &["MIT License"]);
    let mut form = CreateRepositoryPage::new(&mut session).await.unwrap();

    let request = CreateRepositoryRequest::new("tools").with_license("WTFPL");
    form.create_repository(&request).await.unwrap();

    match &form.last_report().unwrap().license {
        TemplateSelection::NotFound {
            requested,
            available,
        } => {
            assert_eq!(requested, "WTFPL");
            assert_eq!(available, &vec!["MIT License".to_string()]);
        }
        other => panic!("unexpected {other:?}"),
    }
    drop(form);
    assert_eq!(session.current_title(), "octocat/tools");
}

#[tokio::test]
async fn test_strict_config_rejects_unavailable_license() {
    let mut session = forge("octocat/tools", &["MIT License"]);
    let config = SiteConfig::new().with_strict_templates(true);
    let mut form = CreateRepositoryPage::with_config(&mut session, config)
        .await
        .unwrap();

    let err = form
        .create_repository(&CreateRepositoryRequest::new("tools").with_license("WTFPL"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepoformError::TemplateNotFound {
            kind: TemplateKind::License,
            ..
        }
    ));
    drop(form);
    assert_eq!(session.current_title(), CREATE_REPOSITORY_TITLE);
}

#[tokio::test]
async fn test_redirect_to_login_is_rejected() {
    let mut session = MockSession::new("Sign in to GitHub · GitHub");
    let err = CreateRepositoryPage::new(&mut session).await.unwrap_err();
    assert!(matches!(err, RepoformError::UnexpectedPage { .. }));
    assert!(!session.was_called("find"));
    assert!(!session.was_called("exists"));
}

#[tokio::test]
async fn test_config_from_yaml_drives_the_page() {
    let config = SiteConfig::from_yaml_str(
        "base_url: http://forge.test\ncreate_title: Create a New Repository\nmatch_policy: contains\n",
    )
    .unwrap();
    let mut session = forge("octocat/lic", &["GNU GPL v3.0", "MIT License"]);
    let mut form = CreateRepositoryPage::open(&mut session, &config).await.unwrap();

    form.create_repository(&CreateRepositoryRequest::new("lic").with_license("GPL"))
        .await
        .unwrap();
    assert!(form.last_report().unwrap().license.is_selected());
    drop(form);
    assert_eq!(session.current_url(), "http://forge.test/new");
    assert_eq!(session.clicks_on_text("GNU GPL v3.0"), 1);
}

proptest! {
    /// The stored name never has surrounding blanks or doubled separators.
    #[test]
    fn prop_normalized_name_has_single_hyphens(
        words in prop::collection::vec("[a-z0-9_.]{1,8}", 1..5),
        gaps in prop::collection::vec(1usize..4, 4),
        lead in 0usize..3,
        trail in 0usize..3,
    ) {
        let mut raw = " ".repeat(lead);
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                raw.push_str(&" ".repeat(gaps[i - 1]));
            }
            raw.push_str(word);
        }
        raw.push_str(&" ".repeat(trail));

        let name = RepositoryName::normalize(&raw);
        prop_assert_eq!(name.as_str(), words.join("-"));
    }

    /// The name the page reports after submission is the normalized input.
    #[test]
    fn prop_workflow_reports_normalized_name(
        words in prop::collection::vec("[a-z]{1,6}", 1..4),
        gap in 1usize..4,
    ) {
        let raw = format!("  {}  ", words.join(&" ".repeat(gap)));
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let stored = runtime.block_on(async {
            let mut session = forge("octocat/any", &[]);
            let mut form = CreateRepositoryPage::new(&mut session).await.unwrap();
            form.create_repository(&CreateRepositoryRequest::new(raw.clone()))
                .await
                .unwrap();
            form.repository_name().unwrap().to_string()
        });
        prop_assert_eq!(stored, words.join("-"));
    }
}
