//! Post-render host setup: module import, measurement, observer, animation events, drag.

use super::events::{invoke_user_handler, AnimationEventBridge};
use super::guard::{guarded_call, guarded_value};
use super::lifecycle::teardown;
use super::{AnimationSlot, DragSlot, Inner, ObserverSlot};
use crate::host::HostModule;
use crate::model::{EngineError, HostError};
use std::rc::Rc;
use tracing::{debug, info, warn};

impl Inner {
    pub(super) async fn after_render(&self, first_render: bool) {
        if self.disposed.get() {
            return;
        }
        if first_render {
            info!(
                container = self.elements.container.id(),
                content = self.elements.content.id(),
                "marquee attached"
            );
        }

        let module = match self.ensure_module().await {
            Ok(module) => module,
            Err(err) => {
                self.absorb("import module", err).await;
                return;
            }
        };

        let layout_ready = match self.sync_layout(&module).await {
            Ok(()) => true,
            Err(err) => {
                if self.absorb("layout", err).await {
                    return;
                }
                false
            }
        };
        if let Err(err) = self.sync_animation_events(&module).await {
            if self.absorb("animation events", err).await {
                return;
            }
        }
        if let Err(err) = self.sync_drag(&module).await {
            if self.absorb("drag handler", err).await {
                return;
            }
        }

        if layout_ready && !self.disposed.get() && !self.mounted.replace(true) {
            info!("marquee mounted");
            if let Some(handler) = &self.callbacks.on_mount {
                let _ = invoke_user_handler("on_mount", handler);
            }
        }
    }

    /// Log a setup failure; returns whether the rest of the pass should be skipped.
    ///
    /// A disconnect releases the module together with every handle it produced, so the next
    /// render re-imports the module and rebuilds the handles against it.
    async fn absorb(&self, step: &'static str, err: EngineError) -> bool {
        let err = err.classify();
        if err.is_cancellation() {
            debug!(step, "setup abandoned: engine disposed");
            return true;
        }
        warn!(step, error = %err, "host setup failed; retrying on next render");
        if matches!(err, EngineError::HostUnavailable(HostError::Disconnected)) {
            debug!("host connection lost; releasing module and handles");
            self.release_handles().await;
            return true;
        }
        false
    }

    async fn ensure_module(&self) -> Result<Rc<dyn HostModule>, EngineError> {
        if let Some(module) = self.module.borrow().clone() {
            return Ok(module);
        }
        let module = guarded_call(&self.cancel, "import_module", self.env.import_module()).await?;
        if self.disposed.get() {
            teardown("orphaned module", module.release()).await;
            return Err(EngineError::Cancelled);
        }
        // A concurrent pass may have won the race.
        let existing = self.module.borrow().clone();
        if let Some(existing) = existing {
            teardown("duplicate module", module.release()).await;
            return Ok(existing);
        }
        debug!("host module imported");
        *self.module.borrow_mut() = Some(Rc::clone(&module));
        Ok(module)
    }

    async fn measure(&self, module: &Rc<dyn HostModule>, vertical: bool) -> Result<(), EngineError> {
        let spans = guarded_value(
            &self.cancel,
            "measure",
            module.measure(self.elements.container, self.elements.content, vertical),
        )
        .await?;
        let changed = self.coordinator.borrow_mut().apply_measurement(spans);
        if changed {
            self.request_render();
        }
        Ok(())
    }

    /// Create the observer on first use; afterwards only switch its axis.
    async fn sync_layout(&self, module: &Rc<dyn HostModule>) -> Result<(), EngineError> {
        let vertical = self.coordinator.borrow().orientation().vertical;
        let existing = self.observer.borrow().clone();

        match existing {
            Some(slot) if slot.vertical == vertical => Ok(()),
            Some(slot) => {
                let updated =
                    guarded_call(&self.cancel, "observer.update", slot.handle.update(vertical))
                        .await;
                if let Err(err) = updated {
                    self.forget_observer(&slot);
                    teardown("stale observer", slot.handle.dispose()).await;
                    return Err(err);
                }
                if let Some(current) = self.observer.borrow_mut().as_mut() {
                    if Rc::ptr_eq(&current.handle, &slot.handle) {
                        current.vertical = vertical;
                    }
                }
                debug!(vertical, "observer axis switched");
                self.measure(module, vertical).await
            }
            None => {
                self.measure(module, vertical).await?;
                let handle = guarded_call(
                    &self.cancel,
                    "observe",
                    module.observe(
                        self.elements.container,
                        self.elements.content,
                        vertical,
                        self.callback.clone(),
                    ),
                )
                .await?;
                if self.disposed.get() || self.observer.borrow().is_some() {
                    teardown("orphaned observer", handle.dispose()).await;
                    return if self.disposed.get() {
                        Err(EngineError::Cancelled)
                    } else {
                        Ok(())
                    };
                }
                debug!(vertical, "layout observer established");
                *self.observer.borrow_mut() = Some(ObserverSlot {
                    handle: Rc::from(handle),
                    vertical,
                });
                Ok(())
            }
        }
    }

    fn forget_observer(&self, slot: &ObserverSlot) {
        let mut current = self.observer.borrow_mut();
        if current
            .as_ref()
            .is_some_and(|c| Rc::ptr_eq(&c.handle, &slot.handle))
        {
            *current = None;
        }
    }

    async fn sync_animation_events(&self, module: &Rc<dyn HostModule>) -> Result<(), EngineError> {
        if !self.callbacks.wants_animation_events() || self.animation.borrow().is_some() {
            return Ok(());
        }
        let handle = guarded_call(
            &self.cancel,
            "setup_animation_events",
            module.setup_animation_events(self.elements.content, self.callback.clone()),
        )
        .await?;
        if self.disposed.get() || self.animation.borrow().is_some() {
            teardown("orphaned animation events", handle.dispose()).await;
            return if self.disposed.get() {
                Err(EngineError::Cancelled)
            } else {
                Ok(())
            };
        }
        debug!("animation events forwarded");
        *self.animation.borrow_mut() = Some(AnimationSlot {
            handle: Rc::from(handle),
            bridge: Rc::new(AnimationEventBridge::new(self.callbacks.clone())),
        });
        Ok(())
    }

    /// Install, update or remove the drag handler to match the parameters.
    async fn sync_drag(&self, module: &Rc<dyn HostModule>) -> Result<(), EngineError> {
        let _guard = self.drag_guard.lock().await;
        if self.disposed.get() {
            return Err(EngineError::Cancelled);
        }
        let (draggable, orientation) = {
            let coordinator = self.coordinator.borrow();
            (coordinator.params().draggable, coordinator.orientation())
        };
        let existing = self.drag.borrow().clone();

        match (draggable, existing) {
            (false, None) => Ok(()),
            (false, Some(slot)) => {
                self.drag.borrow_mut().take();
                debug!("dragging disabled; removing handler");
                teardown("drag handler", slot.handle.dispose()).await;
                Ok(())
            }
            (true, Some(slot)) if slot.orientation == orientation => Ok(()),
            (true, Some(slot)) => {
                let updated = guarded_call(
                    &self.cancel,
                    "drag.update",
                    slot.handle
                        .update(orientation.vertical, orientation.reversed),
                )
                .await;
                match updated {
                    Ok(()) => {
                        if let Some(current) = self.drag.borrow_mut().as_mut() {
                            current.orientation = orientation;
                        }
                        Ok(())
                    }
                    Err(err) => {
                        self.drag.borrow_mut().take();
                        teardown("stale drag handler", slot.handle.dispose()).await;
                        Err(err)
                    }
                }
            }
            (true, None) => {
                let handle = guarded_call(
                    &self.cancel,
                    "setup_drag_handler",
                    module.setup_drag_handler(
                        self.elements.container,
                        self.elements.content,
                        orientation.vertical,
                        orientation.reversed,
                    ),
                )
                .await?;
                if self.disposed.get() {
                    teardown("orphaned drag handler", handle.dispose()).await;
                    return Err(EngineError::Cancelled);
                }
                debug!(?orientation, "drag handler installed");
                *self.drag.borrow_mut() = Some(DragSlot {
                    handle: Rc::from(handle),
                    orientation,
                });
                Ok(())
            }
        }
    }
}
