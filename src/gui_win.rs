//! System tray surface: pause/resume/exit without a console window.

use core::cell::RefCell;

use anyhow::{anyhow, Result};
use native_windows_gui as nwg;
use nwg::NativeUi;

use keywake::Ticker;

#[derive(Default)]
pub struct SystemTray {
    ticker: RefCell<Option<Ticker>>,
    icon: nwg::Icon,
    window: nwg::MessageWindow,
    tray: nwg::TrayNotification,
    tray_menu: nwg::Menu,
    tray_pause: nwg::MenuItem,
    tray_exit: nwg::MenuItem,
}

impl SystemTray {
    fn show_menu(&self) {
        let (x, y) = nwg::GlobalCursor::position();
        self.tray_menu.popup(x, y);
    }

    fn toggle_pause(&self) {
        if let Some(ticker) = self.ticker.borrow().as_ref() {
            if ticker.is_paused() {
                ticker.resume();
                self.tray_pause.set_checked(false);
            } else {
                ticker.pause();
                self.tray_pause.set_checked(true);
            }
        }
    }

    fn exit(&self) {
        if let Some(mut ticker) = self.ticker.borrow_mut().take() {
            ticker.stop();
        }
        nwg::stop_thread_dispatch();
    }
}

/// Runs the tray event loop on the current thread until Exit is chosen.
pub fn run_tray(ticker: Ticker) -> Result<()> {
    nwg::init().map_err(|e| anyhow!("failed to init win32 gui: {e}"))?;
    let paused = ticker.is_paused();
    let tray = SystemTray {
        ticker: RefCell::new(Some(ticker)),
        ..Default::default()
    };
    let ui = SystemTray::build_ui(tray).map_err(|e| anyhow!("failed to build tray ui: {e}"))?;
    ui.tray_pause.set_checked(paused);
    nwg::dispatch_thread_events();
    Ok(())
}

mod system_tray_ui {
    use super::*;
    use std::ops::Deref;
    use std::rc::Rc;

    pub struct SystemTrayUi {
        inner: Rc<SystemTray>,
        handler_def: RefCell<Vec<nwg::EventHandler>>,
    }

    impl nwg::NativeUi<SystemTrayUi> for SystemTray {
        fn build_ui(mut d: SystemTray) -> Result<SystemTrayUi, nwg::NwgError> {
            use nwg::Event as E;

            nwg::Icon::builder()
                .source_system(Some(nwg::OemIcon::Ques))
                .build(&mut d.icon)?;

            nwg::MessageWindow::builder().build(&mut d.window)?;
            nwg::TrayNotification::builder()
                .parent(&d.window)
                .icon(Some(&d.icon))
                .tip(Some("keywake: right click for menu"))
                .build(&mut d.tray)?;
            nwg::Menu::builder()
                .parent(&d.window)
                .popup(true)
                .build(&mut d.tray_menu)?;
            nwg::MenuItem::builder()
                .parent(&d.tray_menu)
                .text("&Pause")
                .build(&mut d.tray_pause)?;
            nwg::MenuItem::builder()
                .parent(&d.tray_menu)
                .text("E&xit")
                .build(&mut d.tray_exit)?;

            let ui = SystemTrayUi {
                inner: Rc::new(d),
                handler_def: Default::default(),
            };

            let evt_ui = Rc::downgrade(&ui.inner);
            let handle_events = move |evt, _evt_data, handle| {
                if let Some(evt_ui) = evt_ui.upgrade() {
                    match evt {
                        E::OnContextMenu => {
                            if &handle == &evt_ui.tray {
                                SystemTray::show_menu(&evt_ui);
                            }
                        }
                        E::OnMenuItemSelected => {
                            if &handle == &evt_ui.tray_pause {
                                SystemTray::toggle_pause(&evt_ui);
                            } else if &handle == &evt_ui.tray_exit {
                                SystemTray::exit(&evt_ui);
                            }
                        }
                        E::OnWindowClose => {
                            if &handle == &evt_ui.window {
                                SystemTray::exit(&evt_ui);
                            }
                        }
                        _ => {}
                    }
                }
            };
            ui.handler_def
                .borrow_mut()
                .push(nwg::full_bind_event_handler(
                    &ui.window.handle,
                    handle_events,
                ));

            Ok(ui)
        }
    }

    impl Drop for SystemTrayUi {
        fn drop(&mut self) {
            for handler in self.handler_def.borrow_mut().drain(..) {
                nwg::unbind_event_handler(&handler);
            }
        }
    }

    impl Deref for SystemTrayUi {
        type Target = SystemTray;
        fn deref(&self) -> &SystemTray {
            &self.inner
        }
    }
}

pub use system_tray_ui::SystemTrayUi;
