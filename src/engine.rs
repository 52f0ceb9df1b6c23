//! Request-scoped interception pipeline.
//!
//! An [`Interceptor`] owns everything one request needs: its
//! [`RequestContext`], its own [`InterceptionRegistry`] and its own
//! [`AdminSafetyWindow`]. Nothing is shared between requests, so
//! concurrent requests cannot see each other's suspended hooks.

use crate::admin::{AdminSafetyWindow, LifecycleEvent, Transition, WindowState};
use crate::bootstrap::{self, CookiePaths};
use crate::context::RequestContext;
use crate::hooks::{Hook, InterceptionRegistry};
use crate::rewrite::{self, UploadDir};

#[derive(Debug, Clone)]
pub struct Interceptor {
    ctx: RequestContext,
    registry: InterceptionRegistry,
    window: AdminSafetyWindow,
}

impl Interceptor {
    #[must_use]
    pub fn new(ctx: RequestContext) -> Self {
        let registry = InterceptionRegistry::new(ctx.variant());
        Self {
            ctx,
            registry,
            window: AdminSafetyWindow::new(),
        }
    }

    #[must_use]
    pub const fn context(&self) -> &RequestContext {
        &self.ctx
    }

    #[must_use]
    pub const fn registry(&self) -> &InterceptionRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn window_state(&self) -> WindowState {
        self.window.state()
    }

    /// Filter a URL-valued hook. Disabled or unbound hooks pass `value` through.
    #[must_use]
    pub fn filter_url(&self, hook: Hook, value: &str) -> String {
        if !self.registry.is_enabled(hook) {
            tracing::trace!(hook = %hook, "hook disabled, value passed through");
            return value.to_string();
        }
        let rewritten = if hook.is_option() {
            rewrite::rewrite_option(value, &self.ctx)
        } else {
            rewrite::rewrite_url(value, &self.ctx)
        };
        tracing::trace!(hook = %hook, from = %value, to = %rewritten, "value rewritten");
        rewritten
    }

    /// Filter the upload directory description.
    #[must_use]
    pub fn filter_upload_dir(&self, dir: UploadDir) -> UploadDir {
        if self.registry.is_enabled(Hook::UploadDir) {
            rewrite::rewrite_upload_dir(dir, &self.ctx)
        } else {
            dir
        }
    }

    /// Feed a render-pipeline event to the settings screen window.
    pub fn dispatch(&mut self, event: LifecycleEvent) -> Transition {
        self.window.handle(event, &mut self.registry)
    }

    /// Cookie paths from the stored home and site values, filtered through
    /// the option hooks exactly as the host application would read them.
    #[must_use]
    pub fn cookie_paths(&self, home: &str, site_url: &str) -> CookiePaths {
        bootstrap::cookie_paths(
            &self.filter_url(Hook::HomeOption, home),
            &self.filter_url(Hook::SiteUrlOption, site_url),
        )
    }
}
