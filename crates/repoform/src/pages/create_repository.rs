//! The "Create a New Repository" form.
//!
//! [`CreateRepositoryPage`] is the only page with a real workflow:
//! [`CreateRepositoryPage::create_repository`] types the name and
//! description, reconciles the README checkbox, picks the requested
//! gitignore and license templates and submits.
//!
//! # Example
//!
//! ```ignore
//! let mut session = CdpSession::new(page);
//! let mut form = CreateRepositoryPage::open(&mut session, &SiteConfig::default()).await?;
//! assert!(form.is_form_present().await?);
//!
//! let request = CreateRepositoryRequest::new("hello world")
//!     .with_description("Greeting service")
//!     .with_readme(true)
//!     .with_license("MIT License");
//! let repo = form.create_repository(&request).await?;
//! assert_eq!(repo.repository_name().as_str(), "hello-world");
//! ```

use tracing::{debug, info, instrument, warn};

use crate::config::SiteConfig;
use crate::driver::Session;
use crate::locator::Selector;
use crate::page_object::{missing_elements, verify_title, LocatorTable, PageObject};
use crate::pages::repository::{RepositoryName, RepositoryPage};
use crate::pages::start::StartPage;
use crate::result::RepoformResult;
use crate::template::{OptionMatch, TemplateKind, TemplateSelection};

/// Elements that must all be present for the form to be usable
pub const REQUIRED_FORM_ELEMENTS: [&str; 9] = [
    "repository_name",
    "repository_description",
    "submit",
    "owner",
    "visibility_public",
    "visibility_private",
    "auto_init",
    "add_gitignore",
    "add_license",
];

/// Option list shared by both template pickers
const TEMPLATE_OPTIONS_XPATH: &str = "//div[@class='select-menu-item js-navigation-item']/div";

fn create_repository_locators() -> LocatorTable {
    LocatorTable::new()
        .with_locator("search", Selector::name("q"))
        .with_locator("repository_name", Selector::id("repository_name"))
        .with_locator("repository_description", Selector::id("repository_description"))
        .with_locator(
            "submit",
            Selector::xpath("//*[contains (text(), 'Create repository')]"),
        )
        .with_locator(
            "owner",
            Selector::xpath("//div[contains(@class, 'owner-container')]/span"),
        )
        .with_locator(
            "visibility_public",
            Selector::xpath("//input[@type='radio'][@id='repository_public_true']"),
        )
        .with_locator(
            "visibility_private",
            Selector::xpath("//input[@type='radio'][@id='repository_public_false']"),
        )
        .with_locator("auto_init", Selector::id("repository_auto_init"))
        .with_locator(
            "add_gitignore",
            Selector::xpath("//*[contains(text(), 'Add .gitignore')]"),
        )
        .with_locator("gitignore_filter", Selector::id("context-ignore-filter-field"))
        .with_locator("gitignore_options", Selector::xpath(TEMPLATE_OPTIONS_XPATH))
        .with_locator(
            "add_license",
            Selector::xpath("//*[contains(text(), 'Add a license')]"),
        )
        .with_locator("license_filter", Selector::id("context-license-filter-field"))
        .with_locator("license_options", Selector::xpath(TEMPLATE_OPTIONS_XPATH))
        .with_locator(
            "sign_out",
            Selector::xpath("//button[contains(@class, 'sign-out-button')]"),
        )
        .with_locator(
            "owner_menu",
            Selector::xpath("//*[contains(text(), 'Choose another owner')]"),
        )
}

/// Parameters of one repository submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateRepositoryRequest {
    /// Name as typed by the user
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Initialize the repository with a README
    pub add_readme: bool,
    /// Gitignore template to pick
    pub gitignore: Option<String>,
    /// License template to pick
    pub license: Option<String>,
    /// Overrides [`SiteConfig::strict_templates`] for this request
    pub strict_templates: Option<bool>,
}

impl CreateRepositoryRequest {
    /// Create a request for `name` with everything else left off
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Request a README
    #[must_use]
    pub const fn with_readme(mut self, add_readme: bool) -> Self {
        self.add_readme = add_readme;
        self
    }

    /// Request a gitignore template
    #[must_use]
    pub fn with_gitignore(mut self, template: impl Into<String>) -> Self {
        self.gitignore = Some(template.into());
        self
    }

    /// Request a license template
    #[must_use]
    pub fn with_license(mut self, template: impl Into<String>) -> Self {
        self.license = Some(template.into());
        self
    }

    /// Fail instead of submitting when a template cannot be selected
    #[must_use]
    pub const fn with_strict_templates(mut self, strict: bool) -> Self {
        self.strict_templates = Some(strict);
        self
    }
}

/// What one submission actually did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRepositoryReport {
    /// Name the forge is expected to store
    pub repository_name: RepositoryName,
    /// Whether the README checkbox had to be clicked
    pub readme_toggled: bool,
    /// Gitignore picker outcome
    pub gitignore: TemplateSelection,
    /// License picker outcome
    pub license: TemplateSelection,
}

impl CreateRepositoryReport {
    /// Whether every requested template was selected
    #[must_use]
    pub const fn templates_resolved(&self) -> bool {
        !self.gitignore.is_unresolved() && !self.license.is_unresolved()
    }
}

/// Results of the three dropdown probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicControlsReport {
    /// Owner switcher opened
    pub owner: bool,
    /// Gitignore picker opened
    pub gitignore: bool,
    /// License picker opened
    pub license: bool,
}

impl DynamicControlsReport {
    /// Whether every dropdown opened
    #[must_use]
    pub const fn all_working(&self) -> bool {
        self.owner && self.gitignore && self.license
    }

    /// Names of the dropdowns that did not open
    #[must_use]
    pub fn failing(&self) -> Vec<&'static str> {
        [
            ("owner", self.owner),
            ("gitignore", self.gitignore),
            ("license", self.license),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Page object for the repository creation form
#[derive(Debug)]
pub struct CreateRepositoryPage<'s, S> {
    session: &'s mut S,
    locators: LocatorTable,
    config: SiteConfig,
    repository_name: Option<RepositoryName>,
    last_report: Option<CreateRepositoryReport>,
}

impl<'s, S: Session> CreateRepositoryPage<'s, S> {
    /// Attach to a session that is already showing the creation form.
    ///
    /// Fails with `UnexpectedPage` if the title is not
    /// "Create a New Repository"; no element is resolved in that case.
    pub async fn new(session: &'s mut S) -> RepoformResult<Self> {
        Self::with_config(session, SiteConfig::default()).await
    }

    /// Attach using a custom site configuration
    pub async fn with_config(session: &'s mut S, config: SiteConfig) -> RepoformResult<Self> {
        verify_title(&*session, &config.create_title).await?;
        Ok(Self {
            session,
            locators: create_repository_locators(),
            config,
            repository_name: None,
            last_report: None,
        })
    }

    /// Navigate to the creation form, then attach
    pub async fn open(session: &'s mut S, config: &SiteConfig) -> RepoformResult<Self> {
        let url = config.create_url();
        info!(%url, "opening repository creation form");
        session.goto(&url).await?;
        Self::with_config(session, config.clone()).await
    }

    /// Site configuration in use
    #[must_use]
    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Names of required form elements that are absent, in form order
    pub async fn missing_form_elements(&self) -> RepoformResult<Vec<String>> {
        missing_elements(&*self.session, &self.locators, &REQUIRED_FORM_ELEMENTS).await
    }

    /// Whether all nine required form elements are present.
    ///
    /// Absent elements give `Ok(false)`; only backend failures are errors.
    pub async fn is_form_present(&self) -> RepoformResult<bool> {
        let missing = self.missing_form_elements().await?;
        if !missing.is_empty() {
            warn!(?missing, "repository form incomplete");
        }
        Ok(missing.is_empty())
    }

    /// Sign out, handing the session to the landing page
    pub async fn logout(self) -> RepoformResult<StartPage<'s, S>> {
        let sign_out = self.session.find(self.locators.get("sign_out")?).await?;
        self.session.click(&sign_out).await?;
        info!("signed out");
        Ok(StartPage::new(self.session))
    }

    async fn probe_dropdown(&self, trigger: &str, panel: &str) -> RepoformResult<bool> {
        let element = self.session.find(self.locators.get(trigger)?).await?;
        self.session.click(&element).await?;
        let opened = self.session.exists(self.locators.get(panel)?).await?;
        debug!(trigger, panel, opened, "dropdown probe");
        Ok(opened)
    }

    /// Click the owner switcher and report whether its menu appeared
    pub async fn probe_owner_dropdown(&self) -> RepoformResult<bool> {
        self.probe_dropdown("owner", "owner_menu").await
    }

    /// Click "Add .gitignore" and report whether its filter appeared
    pub async fn probe_gitignore_dropdown(&self) -> RepoformResult<bool> {
        self.probe_dropdown("add_gitignore", "gitignore_filter").await
    }

    /// Click "Add a license" and report whether its filter appeared
    pub async fn probe_license_dropdown(&self) -> RepoformResult<bool> {
        self.probe_dropdown("add_license", "license_filter").await
    }

    /// Run all three dropdown probes. The dropdowns are left open.
    pub async fn dynamic_controls(&self) -> RepoformResult<DynamicControlsReport> {
        let report = DynamicControlsReport {
            owner: self.probe_owner_dropdown().await?,
            gitignore: self.probe_gitignore_dropdown().await?,
            license: self.probe_license_dropdown().await?,
        };
        info!(?report, "dynamic controls probed");
        Ok(report)
    }

    async fn select_template(
        &self,
        kind: TemplateKind,
        requested: Option<&str>,
    ) -> RepoformResult<TemplateSelection> {
        let Some(requested) = requested else {
            return Ok(TemplateSelection::NotRequested);
        };
        let (trigger, options) = match kind {
            TemplateKind::Gitignore => ("add_gitignore", "gitignore_options"),
            TemplateKind::License => ("add_license", "license_options"),
        };

        let picker = self.session.find(self.locators.get(trigger)?).await?;
        self.session.click(&picker).await?;

        let elements = self.session.find_all(self.locators.get(options)?).await?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in &elements {
            texts.push(self.session.text(element).await?);
        }

        let found = self.config.match_policy.match_options(requested, &texts);
        if let OptionMatch::Unique(index) = found {
            if let Some(option) = elements.get(index) {
                self.session.click(option).await?;
            }
        }

        let selection = TemplateSelection::from_match(requested, &texts, &found);
        match &selection {
            TemplateSelection::Selected { option, .. } => {
                debug!(%kind, %option, "template selected");
            }
            unresolved => warn!(%kind, outcome = ?unresolved, "template not selected"),
        }
        Ok(selection)
    }

    /// Fill in and submit the form.
    ///
    /// The name and description are typed verbatim; the stored name is
    /// predicted with [`RepositoryName::normalize`]. The README checkbox is
    /// clicked only if its state differs from the request. A template is
    /// clicked only when exactly one visible option matches; otherwise the
    /// outcome is recorded in the report, or returned as an error before
    /// submitting when strict templates are enabled. Failures propagate
    /// as-is and leave the form in whatever state the last step produced.
    #[instrument(skip_all, fields(name = %request.name))]
    pub async fn create_repository(
        &mut self,
        request: &CreateRepositoryRequest,
    ) -> RepoformResult<RepositoryPage<'_, S>> {
        let repository_name = RepositoryName::normalize(&request.name);
        let strict = request
            .strict_templates
            .unwrap_or(self.config.strict_templates);

        let name_field = self
            .session
            .find(self.locators.get("repository_name")?)
            .await?;
        self.session.send_keys(&name_field, &request.name).await?;
        let description_field = self
            .session
            .find(self.locators.get("repository_description")?)
            .await?;
        self.session
            .send_keys(&description_field, &request.description)
            .await?;

        let auto_init = self.session.find(self.locators.get("auto_init")?).await?;
        let readme_toggled = self.session.is_selected(&auto_init).await? != request.add_readme;
        if readme_toggled {
            self.session.click(&auto_init).await?;
        }
        debug!(add_readme = request.add_readme, readme_toggled, "readme reconciled");

        let gitignore = self
            .select_template(TemplateKind::Gitignore, request.gitignore.as_deref())
            .await?;
        if strict {
            if let Some(err) = gitignore.to_error(TemplateKind::Gitignore) {
                return Err(err);
            }
        }
        let license = self
            .select_template(TemplateKind::License, request.license.as_deref())
            .await?;
        if strict {
            if let Some(err) = license.to_error(TemplateKind::License) {
                return Err(err);
            }
        }

        let submit = self.session.find(self.locators.get("submit")?).await?;
        self.session.click(&submit).await?;
        info!(repository = %repository_name, "repository form submitted");

        self.repository_name = Some(repository_name.clone());
        self.last_report = Some(CreateRepositoryReport {
            repository_name: repository_name.clone(),
            readme_toggled,
            gitignore,
            license,
        });
        Ok(RepositoryPage::new(&mut *self.session, repository_name))
    }

    /// Stored name from the last completed submission
    #[must_use]
    pub const fn repository_name(&self) -> Option<&RepositoryName> {
        self.repository_name.as_ref()
    }

    /// Report of the last completed submission
    #[must_use]
    pub const fn last_report(&self) -> Option<&CreateRepositoryReport> {
        self.last_report.as_ref()
    }
}

impl<S> PageObject for CreateRepositoryPage<'_, S> {
    fn locators(&self) -> &LocatorTable {
        &self.locators
    }
}
