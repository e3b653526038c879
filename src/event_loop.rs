//! winit event loop that hosts the tray.
//!
//! Posted tasks, menu clicks and tray icon clicks all arrive as user events,
//! so everything touching widgets happens on this one thread.

use crate::backend::NativeBackend;
use crate::collaborators::Collaborators;
use crate::config::TrayConfig;
use crate::display::{Display, Waker};
use crate::listeners::{EventKind, Widget};
use crate::menu::ItemKind;
use crate::tray::{Flow, SystemTray};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use tray_icon::menu::{MenuEvent, MenuId};
use tray_icon::{MouseButton, MouseButtonState, TrayIconEvent};
use winit::event::Event;
use winit::event_loop::{ControlFlow, EventLoopBuilder};

#[derive(Debug)]
pub enum UserEvent {
    /// A task was posted to the display
    Wake,
    Menu(MenuEvent),
    Tray(TrayIconEvent),
}

/// Map a raw tray icon event to the widget event it represents
fn tray_event_kind(event: &TrayIconEvent) -> Option<EventKind> {
    match event {
        TrayIconEvent::Click {
            button: MouseButton::Right,
            button_state: MouseButtonState::Up,
            ..
        } => Some(EventKind::MenuDetect),
        _ => None,
    }
}

/// Map a clicked menu id to the item widget it belongs to
fn menu_widget(id: &MenuId) -> Option<Widget> {
    match ItemKind::from_id(&id.0) {
        Some(ItemKind::Separator) | None => None,
        Some(kind) => Some(Widget::Item(kind)),
    }
}

/// Run the tray until Quit. `on_start` receives the tray handle before the
/// loop starts and may hand it to other threads. Returns the exit code.
pub fn run<F>(config: TrayConfig, collaborators: Collaborators, on_start: F) -> Result<i32>
where
    F: FnOnce(SystemTray),
{
    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event()
        .build()
        .context("Failed to create event loop")?;

    let wake_proxy = Mutex::new(event_loop.create_proxy());
    let waker: Waker = Arc::new(move || {
        let _ = wake_proxy.lock().send_event(UserEvent::Wake);
    });

    let menu_proxy = Mutex::new(event_loop.create_proxy());
    MenuEvent::set_event_handler(Some(move |event| {
        tracing::debug!("Menu event: {:?}", event);
        let _ = menu_proxy.lock().send_event(UserEvent::Menu(event));
    }));

    let tray_proxy = Mutex::new(event_loop.create_proxy());
    TrayIconEvent::set_event_handler(Some(move |event| {
        tracing::debug!("Tray event: {:?}", event);
        let _ = tray_proxy.lock().send_event(UserEvent::Tray(event));
    }));

    let display = Display::new(waker);
    let (tray, mut ui) = SystemTray::new(
        display.handle(),
        Box::new(NativeBackend::new()),
        config,
        collaborators,
    );
    on_start(tray);

    let exit_code = Rc::new(Cell::new(0));
    let loop_exit_code = Rc::clone(&exit_code);

    tracing::info!("Entering tray event loop");

    event_loop
        .run(move |event, elwt| {
            // GTK needs regular pumping on Linux
            if cfg!(target_os = "linux") {
                elwt.set_control_flow(ControlFlow::wait_duration(
                    std::time::Duration::from_millis(16),
                ));
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }

            let flow = match event {
                Event::UserEvent(UserEvent::Wake) => {
                    display.run_pending(&mut ui);
                    Flow::Continue
                }
                Event::UserEvent(UserEvent::Menu(event)) => match menu_widget(&event.id) {
                    Some(widget) => ui.handle_event(widget, EventKind::Selection),
                    None => Flow::Continue,
                },
                Event::UserEvent(UserEvent::Tray(event)) => match tray_event_kind(&event) {
                    Some(kind) => ui.handle_event(Widget::Tray, kind),
                    None => Flow::Continue,
                },
                Event::AboutToWait => {
                    ui.pump();
                    display.run_pending(&mut ui);
                    Flow::Continue
                }
                Event::LoopExiting => {
                    ui.dispose();
                    Flow::Continue
                }
                _ => Flow::Continue,
            };

            if let Flow::Exit(code) = flow {
                loop_exit_code.set(code);
                elwt.exit();
            }
        })
        .context("Tray event loop failed")?;

    Ok(exit_code.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tray_icon::TrayIconId;

    fn click(button: MouseButton, button_state: MouseButtonState) -> TrayIconEvent {
        TrayIconEvent::Click {
            id: TrayIconId::new("lantern"),
            position: Default::default(),
            rect: Default::default(),
            button,
            button_state,
        }
    }

    #[test]
    fn test_right_release_is_menu_detect() {
        assert_eq!(
            tray_event_kind(&click(MouseButton::Right, MouseButtonState::Up)),
            Some(EventKind::MenuDetect)
        );
    }

    #[test]
    fn test_other_clicks_are_ignored() {
        assert_eq!(tray_event_kind(&click(MouseButton::Right, MouseButtonState::Down)), None);
        assert_eq!(tray_event_kind(&click(MouseButton::Left, MouseButtonState::Up)), None);
        assert_eq!(tray_event_kind(&click(MouseButton::Left, MouseButtonState::Down)), None);
        assert_eq!(tray_event_kind(&click(MouseButton::Middle, MouseButtonState::Up)), None);
    }

    #[test]
    fn test_menu_ids_map_to_items() {
        for kind in [ItemKind::Update, ItemKind::Configure, ItemKind::Quit] {
            assert_eq!(menu_widget(&MenuId::new(kind.id())), Some(Widget::Item(kind)));
        }
    }

    #[test]
    fn test_unknown_menu_id_is_ignored() {
        assert_eq!(menu_widget(&MenuId::new("someone.else")), None);
        assert_eq!(menu_widget(&MenuId::new(ItemKind::Separator.id())), None);
    }
}
