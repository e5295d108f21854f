// src/core/menu.rs

use crate::constants::{DEFAULT_BREADCRUMBS_TEMPLATE, DEFAULT_MENU_TEMPLATE, DEFAULT_SITEMAP_TEMPLATE};
use crate::core::container::{MenuItems, Visibility};
use crate::core::context::ActiveContext;
use crate::core::errors::MenuResult;
use crate::core::item::MenuItem;
use crate::core::loader::{ConfigMenuLoader, MenuLoader};
use crate::system::links::{LinkResolver, RouteTable};
use crate::system::localization::{ReturnTranslator, Translator};
use crate::system::security::{Authorizer, OptimisticAuthorizer};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// The capabilities a menu consults while being queried.
#[derive(Clone)]
pub struct MenuServices {
    link_resolver: Arc<dyn LinkResolver>,
    authorizer: Arc<dyn Authorizer>,
    translator: Arc<dyn Translator>,
}

impl MenuServices {
    /// Services with the given resolver, an optimistic authorizer and no translation.
    pub fn new(link_resolver: Arc<dyn LinkResolver>) -> Self {
        Self {
            link_resolver,
            authorizer: Arc::new(OptimisticAuthorizer),
            translator: Arc::new(ReturnTranslator),
        }
    }

    /// Replaces the authorizer, which allows everything by default.
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Replaces the translator, which returns titles unchanged by default.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Resolver used for items without one of their own.
    pub fn link_resolver(&self) -> &dyn LinkResolver {
        self.link_resolver.as_ref()
    }

    /// The authorizer.
    pub fn authorizer(&self) -> &dyn Authorizer {
        self.authorizer.as_ref()
    }

    /// The translator.
    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }
}

impl Default for MenuServices {
    fn default() -> Self {
        Self::new(Arc::new(RouteTable::default()))
    }
}

impl fmt::Debug for MenuServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuServices").finish_non_exhaustive()
    }
}

/// Template references for the three views. Opaque to the menu itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTemplates {
    /// Template of the menu view.
    pub menu: String,
    /// Template of the breadcrumbs view.
    pub breadcrumbs: String,
    /// Template of the sitemap view.
    pub sitemap: String,
}

impl MenuTemplates {
    /// The template for one view.
    pub fn get(&self, visibility: Visibility) -> &str {
        match visibility {
            Visibility::Menu => &self.menu,
            Visibility::Breadcrumbs => &self.breadcrumbs,
            Visibility::Sitemap => &self.sitemap,
        }
    }
}

impl Default for MenuTemplates {
    fn default() -> Self {
        Self {
            menu: DEFAULT_MENU_TEMPLATE.to_string(),
            breadcrumbs: DEFAULT_BREADCRUMBS_TEMPLATE.to_string(),
            sitemap: DEFAULT_SITEMAP_TEMPLATE.to_string(),
        }
    }
}

/// The root of a named navigation tree.
///
/// A menu is populated once by its loader (`init`) and then shared read-only.
/// Per-request state lives in the `ActiveContext` returned by `context`.
pub struct Menu {
    name: String,
    templates: MenuTemplates,
    services: MenuServices,
    loader: Arc<dyn MenuLoader>,
    initialized: bool,
    items: MenuItems,
}

impl Menu {
    /// An uninitialized menu. Call [`Menu::init`] before querying it.
    pub fn new(
        name: impl Into<String>,
        templates: MenuTemplates,
        services: MenuServices,
        loader: Arc<dyn MenuLoader>,
    ) -> Self {
        Self {
            name: name.into(),
            templates,
            services,
            loader,
            initialized: false,
            items: MenuItems::new(),
        }
    }

    /// Starts building a menu with default templates, services and loader.
    pub fn builder(name: impl Into<String>) -> MenuBuilder {
        MenuBuilder::new(name)
    }

    /// Runs the loader. Only the first successful call has any effect.
    pub fn init(&mut self) -> MenuResult<()> {
        if self.initialized {
            log::warn!("Menu '{}' is already initialized. Skipping its loader.", self.name);
            return Ok(());
        }

        let loader = Arc::clone(&self.loader);
        loader.load(self)?;
        self.initialized = true;
        log::debug!("Menu '{}' loaded with {} top-level items.", self.name, self.items.len());
        Ok(())
    }

    /// Whether the loader has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Name the menu is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All three view templates.
    pub fn templates(&self) -> &MenuTemplates {
        &self.templates
    }

    /// Template of the menu view.
    pub fn menu_template(&self) -> &str {
        &self.templates.menu
    }

    /// Template of the breadcrumbs view.
    pub fn breadcrumbs_template(&self) -> &str {
        &self.templates.breadcrumbs
    }

    /// Template of the sitemap view.
    pub fn sitemap_template(&self) -> &str {
        &self.templates.sitemap
    }

    /// Capabilities shared by every item of this menu.
    pub fn services(&self) -> &MenuServices {
        &self.services
    }

    /// Shorthand for `services().translator()`.
    pub fn translator(&self) -> &dyn Translator {
        self.services.translator()
    }

    /// Top-level items.
    pub fn items(&self) -> &MenuItems {
        &self.items
    }

    /// A fresh per-request context using this menu's services, with no route bound.
    pub fn context(&self) -> ActiveContext<'_> {
        ActiveContext::new(&self.services)
    }

    /// The breadcrumb trail: active items from the top level down to the deepest
    /// active descendant. Empty when no top-level item is active.
    pub fn get_path<'m>(&'m self, ctx: &ActiveContext<'_>) -> MenuResult<Vec<&'m MenuItem>> {
        let mut path = Vec::new();
        let mut parent: &MenuItems = &self.items;

        while let Some(item) = parent.find_active_item(ctx)? {
            path.push(item);
            parent = item.items();
        }

        Ok(path)
    }
}

impl Deref for Menu {
    type Target = MenuItems;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl DerefMut for Menu {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("name", &self.name)
            .field("templates", &self.templates)
            .field("initialized", &self.initialized)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

/// Assembles a `Menu` and runs its loader.
pub struct MenuBuilder {
    name: String,
    templates: MenuTemplates,
    services: MenuServices,
    loader: Option<Arc<dyn MenuLoader>>,
}

impl MenuBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: MenuTemplates::default(),
            services: MenuServices::default(),
            loader: None,
        }
    }

    /// Sets the view templates.
    pub fn templates(mut self, templates: MenuTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Sets the capabilities.
    pub fn services(mut self, services: MenuServices) -> Self {
        self.services = services;
        self
    }

    /// Sets the loader. Defaults to an empty [`ConfigMenuLoader`].
    pub fn loader(mut self, loader: Arc<dyn MenuLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Creates the menu and runs its loader.
    pub fn build(self) -> MenuResult<Menu> {
        let loader: Arc<dyn MenuLoader> = match self.loader {
            Some(loader) => loader,
            None => Arc::new(ConfigMenuLoader::default()),
        };
        let mut menu = Menu::new(self.name, self.templates, self.services, loader);
        menu.init()?;
        Ok(menu)
    }
}

impl fmt::Debug for MenuBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuBuilder")
            .field("name", &self.name)
            .field("templates", &self.templates)
            .field("has_loader", &self.loader.is_some())
            .finish_non_exhaustive()
    }
}
