// GUI-subsystem binary: Windows never allocates a console window.
// In CLI mode (--input/-i present) we attach to the launching terminal and
// reconnect stdout/stderr so println!/eprintln! reach it despite
// SUBSYSTEM:WINDOWS.
#![windows_subsystem = "windows"]
#![allow(dead_code)] // API surface kept for the headless CLI and future menus

mod app;
mod canvas;
mod cli;
mod command;
mod components;
mod document;
mod error;
mod io;
pub mod logger;
mod ops;
mod settings;

use app::RetouchFEApp;
use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    // -- CLI / headless mode ------------------------------------------------
    if cli::CliArgs::is_cli_mode() {
        #[cfg(target_os = "windows")]
        attach_parent_console();

        use clap::Parser;
        let args = cli::CliArgs::parse();
        std::process::exit(cli::run(args));
    }

    // -- GUI mode -----------------------------------------------------------

    // Session log overwrites the previous session's file.
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings::WINDOW_WIDTH, settings::WINDOW_HEIGHT])
            .with_title("RetouchFE"),
        ..Default::default()
    };

    eframe::run_native(
        "RetouchFE",
        options,
        Box::new(|cc| Box::new(RetouchFEApp::new(cc))),
    )
}

/// Attach to the parent process's console and reopen CONOUT$ so the std
/// handles are valid again under SUBSYSTEM:WINDOWS.
#[cfg(target_os = "windows")]
fn attach_parent_console() {
    unsafe extern "system" {
        fn AttachConsole(dwProcessId: u32) -> i32;
        fn SetStdHandle(nStdHandle: u32, hHandle: isize) -> i32;
        fn CreateFileW(
            lpFileName: *const u16,
            dwDesiredAccess: u32,
            dwShareMode: u32,
            lpSecurityAttributes: *const std::ffi::c_void,
            dwCreationDisposition: u32,
            dwFlagsAndAttributes: u32,
            hTemplateFile: isize,
        ) -> isize;
    }
    const ATTACH_PARENT_PROCESS: u32 = 0xFFFF_FFFF;
    const GENERIC_WRITE: u32 = 0x4000_0000;
    const FILE_SHARE_READ_WRITE: u32 = 0x0000_0003;
    const OPEN_EXISTING: u32 = 3;
    const STD_OUTPUT_HANDLE: u32 = 0xFFFF_FFF5_u32; // -11
    const STD_ERROR_HANDLE: u32 = 0xFFFF_FFF4_u32; // -12
    const INVALID_HANDLE_VALUE: isize = -1;

    unsafe {
        AttachConsole(ATTACH_PARENT_PROCESS);
        let conout: Vec<u16> = "CONOUT$\0".encode_utf16().collect();
        let handle = CreateFileW(
            conout.as_ptr(),
            GENERIC_WRITE,
            FILE_SHARE_READ_WRITE,
            std::ptr::null(),
            OPEN_EXISTING,
            0,
            0,
        );
        if handle != INVALID_HANDLE_VALUE {
            SetStdHandle(STD_OUTPUT_HANDLE, handle);
            SetStdHandle(STD_ERROR_HANDLE, handle);
        }
    }
}
