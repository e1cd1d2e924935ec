use shared::domain::{OperationKind, ScreenId};

use crate::controller::ScreenController;

pub type StartFn = fn(&mut ScreenController);
pub type StopFn = fn(&mut ScreenController);

#[derive(Clone, Copy)]
pub enum Lifecycle {
    OneShot,
    /// The pipeline never terminates on its own; `stop` must release it.
    Continuous { stop: StopFn },
}

#[derive(Clone, Copy)]
pub struct OperationDef {
    pub id: ScreenId,
    pub title: &'static str,
    pub description: &'static str,
    pub start: StartFn,
    pub lifecycle: Lifecycle,
}

impl OperationDef {
    pub const fn one_shot(
        id: ScreenId,
        title: &'static str,
        description: &'static str,
        start: StartFn,
    ) -> Self {
        Self {
            id,
            title,
            description,
            start,
            lifecycle: Lifecycle::OneShot,
        }
    }

    pub const fn continuous(
        id: ScreenId,
        title: &'static str,
        description: &'static str,
        start: StartFn,
        stop: StopFn,
    ) -> Self {
        Self {
            id,
            title,
            description,
            start,
            lifecycle: Lifecycle::Continuous { stop },
        }
    }

    pub fn is_continuous_operation(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Continuous { .. })
    }

    pub fn kind(&self) -> OperationKind {
        match self.lifecycle {
            Lifecycle::OneShot => OperationKind::OneShot,
            Lifecycle::Continuous { .. } => OperationKind::Continuous,
        }
    }
}

impl std::fmt::Debug for OperationDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDef")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("kind", &self.kind())
            .finish()
    }
}

pub fn cancel_primary(screen: &mut ScreenController) {
    screen.cancel_primary();
}
