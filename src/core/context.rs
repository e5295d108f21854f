// src/core/context.rs

use crate::core::item::ItemId;
use crate::core::menu::MenuServices;
use crate::system::links::RequestUrl;
use crate::system::route::CurrentRoute;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy)]
struct Memo {
    revision: u64,
    active: bool,
}

/// Per-request state for querying a shared menu tree.
///
/// Holds the bound route, the optional request URL and the memo of active-state
/// results. The tree itself is never written to while resolving, so any number
/// of contexts can query the same menu. A context lives on one thread for the
/// duration of one request.
pub struct ActiveContext<'a> {
    services: &'a MenuServices,
    route: Option<&'a dyn CurrentRoute>,
    request: Option<&'a RequestUrl>,
    memo: RefCell<HashMap<ItemId, Memo>>,
}

impl<'a> ActiveContext<'a> {
    /// A context with no route and no request bound.
    pub fn new(services: &'a MenuServices) -> Self {
        Self {
            services,
            route: None,
            request: None,
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// Binds the current route.
    pub fn with_route(mut self, route: &'a dyn CurrentRoute) -> Self {
        self.set_active_route(Some(route));
        self
    }

    /// Binds the request URL used for absolute links.
    pub fn with_request(mut self, request: &'a RequestUrl) -> Self {
        self.request = Some(request);
        self
    }

    /// Binds (or unbinds) the current route and drops every memoized result.
    pub fn set_active_route(&mut self, route: Option<&'a dyn CurrentRoute>) {
        self.route = route;
        self.invalidate();
    }

    /// The bound route, if any.
    pub fn active_route(&self) -> Option<&'a dyn CurrentRoute> {
        self.route
    }

    /// Binds or clears the request URL.
    pub fn set_request(&mut self, request: Option<&'a RequestUrl>) {
        self.request = request;
    }

    /// The bound request URL, if any.
    pub fn request(&self) -> Option<&'a RequestUrl> {
        self.request
    }

    /// Capabilities of the menu this context belongs to.
    pub fn services(&self) -> &'a MenuServices {
        self.services
    }

    /// Forgets every memoized active-state result.
    pub fn invalidate(&self) {
        self.memo.borrow_mut().clear();
    }

    /// Number of items whose active state is currently memoized.
    pub fn memoized(&self) -> usize {
        self.memo.borrow().len()
    }

    pub(crate) fn recall(&self, id: ItemId, revision: u64) -> Option<bool> {
        self.memo
            .borrow()
            .get(&id)
            .filter(|memo| memo.revision == revision)
            .map(|memo| memo.active)
    }

    pub(crate) fn remember(&self, id: ItemId, revision: u64, active: bool) {
        self.memo
            .borrow_mut()
            .insert(id, Memo { revision, active });
    }
}

impl fmt::Debug for ActiveContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveContext")
            .field("route", &self.route.map(|route| route.signature()))
            .field("request", &self.request)
            .field("memoized", &self.memoized())
            .finish_non_exhaustive()
    }
}
