//! Responsive wrappers. They render their inner component with a display
//! class so the stylesheet can hide it on one side of the breakpoint.

use super::{Component, ComponentProps, ComponentRef, DisplayClass};
use maud::Markup;
use std::sync::Arc;

fn render_with(
    inner: &ComponentRef,
    class: DisplayClass,
    props: &ComponentProps<'_>,
    children: &[Markup],
) -> Markup {
    let props = ComponentProps {
        display_class: Some(class),
        ..*props
    };
    inner.render(&props, children)
}

pub struct MobileOnly {
    inner: ComponentRef,
}

impl MobileOnly {
    pub fn new(inner: ComponentRef) -> Self {
        Self { inner }
    }
}

impl Component for MobileOnly {
    fn name(&self) -> &'static str {
        "MobileOnly"
    }

    fn render(&self, props: &ComponentProps<'_>, children: &[Markup]) -> Markup {
        render_with(&self.inner, DisplayClass::MobileOnly, props, children)
    }

    fn nested(&self) -> Vec<ComponentRef> {
        vec![Arc::clone(&self.inner)]
    }
}

pub struct DesktopOnly {
    inner: ComponentRef,
}

impl DesktopOnly {
    pub fn new(inner: ComponentRef) -> Self {
        Self { inner }
    }
}

impl Component for DesktopOnly {
    fn name(&self) -> &'static str {
        "DesktopOnly"
    }

    fn render(&self, props: &ComponentProps<'_>, children: &[Markup]) -> Markup {
        render_with(&self.inner, DisplayClass::DesktopOnly, props, children)
    }

    fn nested(&self) -> Vec<ComponentRef> {
        vec![Arc::clone(&self.inner)]
    }
}
