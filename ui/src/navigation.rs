// Route changes triggered from outside the view tree
use leptos_router::NavigateOptions;
use std::rc::Rc;

pub trait Navigator {
    fn navigate(&self, route: &str);
}

impl<T: Navigator + ?Sized> Navigator for Rc<T> {
    fn navigate(&self, route: &str) {
        (**self).navigate(route)
    }
}

/// Navigator backed by the closure from `leptos_router::use_navigate`.
#[derive(Clone)]
pub struct RouterNavigator {
    navigate: Rc<dyn Fn(&str, NavigateOptions)>,
}

impl RouterNavigator {
    pub fn new(navigate: impl Fn(&str, NavigateOptions) + 'static) -> Self {
        Self {
            navigate: Rc::new(navigate),
        }
    }
}

impl Navigator for RouterNavigator {
    fn navigate(&self, route: &str) {
        tracing::debug!(route, "navigating");
        (self.navigate)(route, NavigateOptions::default());
    }
}
