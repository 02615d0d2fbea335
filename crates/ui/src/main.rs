use gpui::*;
use gpui_component::notification::NotificationList;
use gpui_component::{Root, Theme};
use tracing_subscriber::EnvFilter;

use moped::app::{ChatAppShell, NewChat, Quit, ToggleSidebar, ToggleTheme};
use moped::settings::{Settings, theme_mode};

/// Application entry point.
///
/// Bootstraps the GPUI application with:
/// 1. Logging filtered by `RUST_LOG` (defaults to `info`)
/// 2. Startup settings from the config directory and `MOPED_*` variables
/// 3. The tokio bridge used by reply timers and speech capture
/// 4. gpui-component initialization and the initial theme mode
/// 5. Window creation with the Root wrapper
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load();
    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        gpui_tokio_bridge::init(cx);

        // Required before any Root usage.
        gpui_component::init(cx);
        Theme::change(theme_mode(settings.appearance), None, cx);

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });

        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("cmd-n", NewChat, None),
            KeyBinding::new("cmd-b", ToggleSidebar, None),
            KeyBinding::new("cmd-shift-t", ToggleTheme, None),
        ]);

        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(1200.), px(800.)),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        title: Some("Moped".into()),
                        appears_transparent: true,
                        traffic_light_position: Some(point(px(9.), px(9.))),
                    }),
                    // Client decorations on Linux/FreeBSD; the shell draws its own title area.
                    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
                    window_decorations: Some(WindowDecorations::Client),
                    #[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
                    window_decorations: None,
                    ..Default::default()
                };

                let opened = cx.open_window(options, |window, cx| {
                    let notification_list = cx.new(|cx| NotificationList::new(window, cx));
                    let shell = cx.new(|cx| {
                        let shell = ChatAppShell::new(notification_list, &settings, window, cx);
                        shell.focus(window);
                        shell
                    });

                    cx.new(|cx| Root::new(shell, window, cx))
                });

                if let Err(error) = opened {
                    tracing::error!("failed to open main window: {}", error);
                    cx.quit();
                    return;
                }

                cx.activate(true);
            })
        })
        .detach();
    });
}
