use std::fs;

use deck_shell::apps::{DirBrowser, Mode, TextEditor};
use deck_shell::components::{Menu, MenuItem, TextEditBuffer, wrap_lines};
use deck_shell::drivers::{Headless, ScriptedInput};
use deck_shell::editor::StructuralEditor;
use deck_shell::expr::{Expr, parse};
use deck_shell::keybindings::Message;
use deck_shell::namespace::Namespace;
use deck_shell::storage::FsStorage;
use deck_shell::ui::Screen;
use deck_shell::window::{Metrics, Window};
use deck_shell::{ShellContext, ShellResult};
use ratatui::layout::Rect;
use tempfile::TempDir;

fn card() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("foo.txt"), "hello\n").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    dir
}

fn context(dir: &TempDir, input: ScriptedInput) -> ShellContext {
    ShellContext::new(
        Screen::new(60, 20, Metrics::TERMINAL),
        Box::new(input),
        Box::new(Headless::new()),
        Box::new(FsStorage::new(dir.path())),
        Box::new(Namespace::empty()),
    )
}

fn send_text(browser: &mut DirBrowser, ctx: &mut ShellContext, text: &str) {
    for c in text.chars() {
        browser.send(&Message::Char(c), ctx).unwrap();
    }
}

#[test]
fn browser_descends_and_ascends() {
    let dir = card();
    let mut ctx = context(&dir, ScriptedInput::default());
    let mut browser = DirBrowser::new(None, &mut ctx);
    assert_eq!(browser.labels(), vec!["foo.txt", "sub/"]);
    browser.send(&Message::Down, &mut ctx).unwrap();
    browser.send(&Message::Enter, &mut ctx).unwrap();
    assert_eq!(browser.path(), "/sub");
    assert!(browser.labels().is_empty());
    browser.send(&Message::Left, &mut ctx).unwrap();
    assert_eq!(browser.path(), "/");
    assert_eq!(browser.labels(), vec!["foo.txt", "sub/"]);
    // already at the root
    browser.send(&Message::Left, &mut ctx).unwrap();
    assert_eq!(browser.path(), "/");
}

#[test]
fn browser_opens_at_argument_directory() {
    let dir = card();
    let mut ctx = context(&dir, ScriptedInput::default());
    let browser = DirBrowser::new(Some(&ShellResult::path("/sub")), &mut ctx);
    assert_eq!(browser.path(), "/sub");
    let browser = DirBrowser::new(Some(&ShellResult::path("/foo.txt")), &mut ctx);
    assert_eq!(browser.path(), "/");
}

#[test]
fn browser_input_modes_change_the_card() {
    let dir = card();
    let mut ctx = context(&dir, ScriptedInput::default());
    let mut browser = DirBrowser::new(None, &mut ctx);

    send_text(&mut browser, &mut ctx, "n");
    assert_eq!(browser.mode(), Mode::New);
    send_text(&mut browser, &mut ctx, "new.txtx");
    browser.send(&Message::Del, &mut ctx).unwrap();
    assert_eq!(browser.input(), "new.txt");
    browser.send(&Message::Enter, &mut ctx).unwrap();
    assert_eq!(browser.mode(), Mode::Navigate);
    assert!(dir.path().join("new.txt").is_file());

    send_text(&mut browser, &mut ctx, "fbox");
    browser.send(&Message::Enter, &mut ctx).unwrap();
    assert!(dir.path().join("box").is_dir());

    // entries are now box/, foo.txt, new.txt, sub/
    assert_eq!(browser.labels(), vec!["box/", "foo.txt", "new.txt", "sub/"]);
    browser.send(&Message::Down, &mut ctx).unwrap();
    send_text(&mut browser, &mut ctx, "rbar.txt");
    browser.send(&Message::Enter, &mut ctx).unwrap();
    assert!(!dir.path().join("foo.txt").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("bar.txt")).unwrap(),
        "hello\n"
    );
}

#[test]
fn browser_delete_asks_first() {
    let dir = card();
    // decline, then accept and dismiss the report
    let input = ScriptedInput::default().typed("nyk");
    let mut ctx = context(&dir, input);
    let mut browser = DirBrowser::new(None, &mut ctx);
    browser.send(&Message::Del, &mut ctx).unwrap();
    assert!(dir.path().join("foo.txt").exists());
    browser.send(&Message::Del, &mut ctx).unwrap();
    assert!(!dir.path().join("foo.txt").exists());
    assert_eq!(browser.labels(), vec!["sub/"]);
}

#[test]
fn edit_buffer_cursor_walk() {
    let win = Window::new(Metrics::TERMINAL, Rect::new(0, 0, 20, 10), Some("t"));
    let mut buf = TextEditBuffer::new(win, vec!["a".into(), "bc".into()]);
    assert_eq!(buf.cursor(), (0, 0));
    buf.right();
    assert_eq!(buf.cursor(), (1, 0));
    buf.right();
    assert_eq!(buf.cursor(), (0, 1));
    buf.right();
    assert_eq!(buf.cursor(), (1, 1));
}

#[test]
fn menu_selection_stays_visible() {
    let win = Window::new(Metrics::TERMINAL, Rect::new(0, 0, 20, 7), Some("m"));
    let items = (0..10).map(|i| MenuItem::new(format!("item {i}"), i)).collect();
    let mut menu = Menu::new(win, items);
    let rows = menu.window().tmax_y() as usize;
    for _ in 0..20 {
        menu.down();
        let sel = menu.selected();
        assert!(sel < menu.len());
        assert!(menu.scroll() <= sel && sel < menu.scroll() + rows);
    }
    assert_eq!(menu.selected(), 9);
    for _ in 0..20 {
        menu.up();
        assert!(menu.scroll() <= menu.selected());
    }
    assert_eq!((menu.selected(), menu.scroll()), (0, 0));
}

#[test]
fn wrapping_is_idempotent() {
    let lines = ["short", "a much longer line that must wrap", ""];
    let once = wrap_lines(&lines, 7);
    assert!(once.iter().all(|l| l.chars().count() <= 7));
    assert_eq!(wrap_lines(&once, 7), once);
}

#[test]
fn editor_without_commands_highlights_everything() {
    let original = parse("(defun f (x) x)").unwrap();
    let editor = StructuralEditor::new(original.clone());
    assert_eq!(editor.edited(), original);
    assert_eq!(editor.preview(), Expr::focus(original));
}

#[test]
fn car_then_back_keeps_content() {
    let original = parse("(f (g) 1)").unwrap();
    let mut editor = StructuralEditor::new(original.clone());
    editor.push_atomic('a');
    editor.push_atomic('b');
    assert_eq!(editor.edited(), original);
    assert_eq!(editor.preview().without_focus(), original);
}

#[test]
fn editor_on_missing_file_starts_empty_and_saves_empty() {
    let dir = card();
    let mut ctx = context(&dir, ScriptedInput::default().typed("y"));
    let mut editor = TextEditor::new(Some(&ShellResult::path("/new.txt")), &mut ctx);
    assert_eq!(editor.buffer().lines().to_vec(), vec![String::new()]);
    assert_eq!(editor.notice(), Some("Cannot open /new.txt"));

    editor.send(&Message::Save, &mut ctx).unwrap();
    assert_eq!(fs::read_to_string(dir.path().join("new.txt")).unwrap(), "");
    // the notice is painted once and then dropped
    assert_eq!(editor.notice(), None);
    let shown = (0..20).any(|row| ctx.screen().row_text(row).contains("Cannot open /new.txt"));
    assert!(shown);
}

#[test]
fn editor_reload_and_clear_ask_first() {
    let dir = card();
    let mut ctx = context(&dir, ScriptedInput::default().typed("yy"));
    let mut editor = TextEditor::new(Some(&ShellResult::path("/foo.txt")), &mut ctx);
    assert_eq!(editor.notice(), None);
    editor.send(&Message::Char('Z'), &mut ctx).unwrap();
    assert_eq!(editor.buffer().text(), "Zhello");

    editor.send(&Message::Load, &mut ctx).unwrap();
    assert_eq!(editor.buffer().text(), "hello");
    editor.send(&Message::New, &mut ctx).unwrap();
    assert_eq!(editor.buffer().text(), "");
    // nothing was saved
    assert_eq!(fs::read_to_string(dir.path().join("foo.txt")).unwrap(), "hello\n");
}
