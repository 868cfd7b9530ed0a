#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::fs;
    use std::path::{Path, PathBuf};

    use anyhow::{anyhow, Result};
    use tempfile::TempDir;

    use crate::app::{App, Dialogs, NameValidator, NoticeLevel, Screen};
    use crate::clipboard::ClipboardSink;
    use crate::error::StoreError;
    use crate::storage::{Storage, PROMPT_FILENAME};

    /// Dialogs that answer from a script and record what they were shown
    #[derive(Default)]
    struct ScriptedDialogs {
        confirms: VecDeque<bool>,
        directories: VecDeque<Option<PathBuf>>,
        /// Names typed into the rename dialog, tried in order until one validates
        rename_attempts: Vec<String>,
        asked: Vec<String>,
        notices: Vec<(NoticeLevel, String, String)>,
        rename_errors: Vec<String>,
    }

    impl ScriptedDialogs {
        fn confirming(answers: &[bool]) -> Self {
            Self {
                confirms: answers.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn errors(&self) -> Vec<&str> {
            self.notices
                .iter()
                .filter(|(level, _, _)| *level != NoticeLevel::Info)
                .map(|(_, _, message)| message.as_str())
                .collect()
        }
    }

    impl Dialogs for ScriptedDialogs {
        fn confirm(&mut self, title: &str, _message: &str) -> bool {
            self.asked.push(title.to_string());
            self.confirms.pop_front().expect("unexpected confirmation")
        }

        fn notify(&mut self, level: NoticeLevel, title: &str, message: &str) {
            self.notices.push((level, title.to_string(), message.to_string()));
        }

        fn pick_directory(&mut self, _suggested: Option<&Path>) -> Option<PathBuf> {
            self.directories.pop_front().flatten()
        }

        fn ask_new_name(&mut self, _current: &str, validate: &NameValidator<'_>) -> Option<String> {
            for attempt in std::mem::take(&mut self.rename_attempts) {
                match validate(&attempt) {
                    Ok(name) => return Some(name),
                    Err(e) => self.rename_errors.push(e.to_string()),
                }
            }
            None
        }
    }

    #[derive(Default)]
    struct RecordingClipboard {
        contents: Option<String>,
        broken: bool,
    }

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&mut self, content: &str) -> Result<()> {
            if self.broken {
                return Err(anyhow!("No system clipboard is available"));
            }
            self.contents = Some(content.to_string());
            Ok(())
        }
    }

    fn write_prompts(dir: &Path, json: &str) {
        fs::write(dir.join(PROMPT_FILENAME), json).unwrap();
    }

    /// App loaded from a directory holding `json`
    fn loaded_app(json: &str) -> (TempDir, App) {
        let temp_dir = TempDir::new().unwrap();
        write_prompts(temp_dir.path(), json);
        let mut app = App::new(None);
        app.load_directory(temp_dir.path().to_path_buf(), &mut ScriptedDialogs::default());
        assert!(app.store().is_some());
        (temp_dir, app)
    }

    fn on_disk(dir: &TempDir) -> Vec<(String, String)> {
        Storage::new(dir.path()).load().unwrap().into_iter().collect()
    }

    fn open(app: &mut App, name: &str) {
        app.list_mut().select(name);
        app.open_selected(&mut ScriptedDialogs::default());
        assert_eq!(app.current_prompt(), Some(name));
    }

    fn type_into_body(app: &mut App, text: &str) {
        let Screen::ViewEdit(view) = app.screen_mut() else {
            panic!("not on the view/edit screen");
        };
        view.body_mut().unwrap().insert_str(text);
    }

    #[test]
    fn test_startup_creates_missing_file_on_confirmation() {
        let temp_dir = TempDir::new().unwrap();
        let mut ui = ScriptedDialogs::confirming(&[true]);
        ui.directories.push_back(Some(temp_dir.path().to_path_buf()));

        let mut app = App::new(None);
        app.start(&mut ui);

        assert_eq!(ui.asked, vec!["Create Prompt File?"]);
        assert!(app.store().unwrap().is_empty());
        assert!(on_disk(&temp_dir).is_empty());
        assert!(app.directory_label().contains(PROMPT_FILENAME));
    }

    #[test]
    fn test_startup_without_directory() {
        let mut ui = ScriptedDialogs::default();
        ui.directories.push_back(None);

        let mut app = App::new(None);
        app.start(&mut ui);

        assert!(app.store().is_none());
        assert_eq!(app.directory_label(), "Directory: None Selected");
        assert_eq!(ui.errors(), vec!["No directory selected. Cannot load or save prompts."]);
    }

    #[test]
    fn test_startup_declining_file_creation_is_not_a_cancel() {
        let temp_dir = TempDir::new().unwrap();
        let mut ui = ScriptedDialogs::confirming(&[false]);
        ui.directories.push_back(Some(temp_dir.path().to_path_buf()));

        let mut app = App::new(None);
        app.start(&mut ui);

        assert_eq!(ui.asked, vec!["Create Prompt File?"]);
        assert!(app.store().is_none());
        assert!(ui.errors().is_empty());
        assert!(ui
            .notices
            .iter()
            .any(|(_, _, message)| message.starts_with("Proceeding without")));
        assert!(!temp_dir.path().join(PROMPT_FILENAME).exists());
    }

    #[test]
    fn test_malformed_file_is_kept_when_declined() {
        let temp_dir = TempDir::new().unwrap();
        write_prompts(temp_dir.path(), "[1, 2]");
        let mut ui = ScriptedDialogs::confirming(&[false]);

        let mut app = App::new(None);
        app.load_directory(temp_dir.path().to_path_buf(), &mut ui);

        assert!(app.store().is_none());
        assert_eq!(ui.notices[0].0, NoticeLevel::Warning);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join(PROMPT_FILENAME)).unwrap(),
            "[1, 2]"
        );

        // Without a bound file, "new prompt" goes back to the picker
        let mut ui = ScriptedDialogs::default();
        ui.directories.push_back(None);
        app.new_prompt(&mut ui);
        assert_eq!(app.screen(), &Screen::List);
    }

    #[test]
    fn test_malformed_file_is_replaced_when_confirmed() {
        let temp_dir = TempDir::new().unwrap();
        write_prompts(temp_dir.path(), "{ broken");
        let mut ui = ScriptedDialogs::confirming(&[true]);

        let mut app = App::new(None);
        app.load_directory(temp_dir.path().to_path_buf(), &mut ui);

        assert_eq!(ui.notices[0].0, NoticeLevel::Error);
        assert!(app.store().unwrap().is_empty());
        assert!(on_disk(&temp_dir).is_empty());
    }

    #[test]
    fn test_create_flow() {
        let (dir, mut app) = loaded_app("{}");
        let mut ui = ScriptedDialogs::default();

        app.new_prompt(&mut ui);
        let Screen::Create(form) = app.screen_mut() else {
            panic!("expected create screen");
        };
        form.name.insert_str("Greeting");
        form.toggle_focus();
        form.body.insert_str("Hello there");

        app.save_new_prompt(&mut ui);

        assert_eq!(app.screen(), &Screen::List);
        assert_eq!(app.list().names(), ["Greeting"]);
        assert_eq!(app.list().selected(), Some("Greeting"));
        assert_eq!(
            on_disk(&dir),
            vec![("Greeting".to_string(), "Hello there".to_string())]
        );
    }

    #[test]
    fn test_create_validation_stays_on_form() {
        let (_dir, mut app) = loaded_app("{}");
        let mut ui = ScriptedDialogs::default();

        app.new_prompt(&mut ui);
        if let Screen::Create(form) = app.screen_mut() {
            form.name.insert_str("Named");
        }
        app.save_new_prompt(&mut ui);

        assert!(matches!(app.screen(), Screen::Create(_)));
        assert_eq!(ui.errors(), vec![StoreError::EmptyBody.to_string()]);
        assert!(app.store().unwrap().is_empty());
    }

    #[test]
    fn test_create_collision_asks_before_overwriting() {
        let (dir, mut app) = loaded_app(r#"{"A": "x"}"#);

        for (answer, expected) in [(false, "x"), (true, "new")] {
            let mut ui = ScriptedDialogs::confirming(&[answer]);
            if app.screen() == &Screen::List {
                app.new_prompt(&mut ui);
            }
            if let Screen::Create(form) = app.screen_mut() {
                form.name.set_text("A");
                form.body.set_text("new");
            }
            app.save_new_prompt(&mut ui);

            assert_eq!(ui.asked, vec!["Overwrite Confirmation"]);
            assert_eq!(on_disk(&dir)[0].1, expected);
        }
        assert_eq!(app.screen(), &Screen::List);
    }

    #[test]
    fn test_cancel_create_confirms_only_with_input() {
        let (_dir, mut app) = loaded_app("{}");

        let mut ui = ScriptedDialogs::default();
        app.new_prompt(&mut ui);
        app.cancel_create(&mut ui);
        assert_eq!(app.screen(), &Screen::List);
        assert!(ui.asked.is_empty());

        app.new_prompt(&mut ui);
        if let Screen::Create(form) = app.screen_mut() {
            form.body.insert_str("draft");
        }
        let mut ui = ScriptedDialogs::confirming(&[false, true]);
        app.cancel_create(&mut ui);
        assert!(matches!(app.screen(), Screen::Create(_)));
        app.cancel_create(&mut ui);
        assert_eq!(app.screen(), &Screen::List);
    }

    #[test]
    fn test_list_is_sorted_and_requires_selection() {
        let (_dir, mut app) = loaded_app(r#"{"B": "y", "A": "x"}"#);
        assert_eq!(app.list().names(), ["A", "B"]);
        assert!(!app.list().actions_enabled());

        let mut ui = ScriptedDialogs::default();
        app.open_selected(&mut ui);
        app.delete_selected(&mut ui);
        assert_eq!(app.screen(), &Screen::List);
        assert_eq!(ui.notices.len(), 2);
        assert_eq!(app.store().unwrap().len(), 2);
    }

    #[test]
    fn test_view_edit_save_flow() {
        let (dir, mut app) = loaded_app(r#"{"A": "x"}"#);
        open(&mut app, "A");
        let mut ui = ScriptedDialogs::default();

        app.toggle_edit(&mut ui);
        type_into_body(&mut app, "yz ");
        app.save_body(&mut ui);

        let Screen::ViewEdit(view) = app.screen() else {
            panic!("expected view/edit screen");
        };
        assert!(!view.editing());
        assert_eq!(view.body().text(), "xyz");
        assert_eq!(app.current_prompt(), Some("A"));
        assert_eq!(on_disk(&dir)[0].1, "xyz");
    }

    #[test]
    fn test_toggle_off_discards_draft() {
        let (dir, mut app) = loaded_app(r#"{"A": "x"}"#);
        open(&mut app, "A");

        let mut ui = ScriptedDialogs::confirming(&[false, true]);
        app.toggle_edit(&mut ui);
        type_into_body(&mut app, " edited");

        app.toggle_edit(&mut ui);
        assert!(app.has_unsaved_changes());

        app.toggle_edit(&mut ui);
        let Screen::ViewEdit(view) = app.screen() else {
            panic!("expected view/edit screen");
        };
        assert!(!view.editing());
        assert_eq!(view.body().text(), "x");
        assert_eq!(on_disk(&dir)[0].1, "x");
    }

    #[test]
    fn test_return_to_list_with_unsaved_body() {
        let (_dir, mut app) = loaded_app(r#"{"A": "x"}"#);
        open(&mut app, "A");
        let mut ui = ScriptedDialogs::confirming(&[false, true]);

        app.toggle_edit(&mut ui);
        type_into_body(&mut app, "!");

        app.return_to_list(&mut ui);
        assert_eq!(app.current_prompt(), Some("A"));

        app.return_to_list(&mut ui);
        assert_eq!(app.screen(), &Screen::List);
        assert_eq!(app.current_prompt(), None);
        assert_eq!(app.list().selected(), Some("A"));
        assert_eq!(app.store().unwrap().get("A"), Some("x"));
    }

    #[test]
    fn test_return_to_list_unchanged_edit_needs_no_confirmation() {
        let (_dir, mut app) = loaded_app(r#"{"A": "x"}"#);
        open(&mut app, "A");
        let mut ui = ScriptedDialogs::default();

        app.toggle_edit(&mut ui);
        app.return_to_list(&mut ui);
        assert_eq!(app.screen(), &Screen::List);
        assert!(ui.asked.is_empty());
    }

    #[test]
    fn test_rename_flow() {
        let (dir, mut app) = loaded_app(r#"{"A": "x", "B": "y"}"#);
        open(&mut app, "A");

        let mut ui = ScriptedDialogs {
            rename_attempts: vec!["B".into(), " ".into(), "C".into()],
            ..ScriptedDialogs::default()
        };
        app.rename_current(&mut ui);

        assert_eq!(
            ui.rename_errors,
            vec![
                StoreError::Duplicate("B".into()).to_string(),
                StoreError::EmptyName.to_string(),
            ]
        );
        assert_eq!(app.current_prompt(), Some("C"));
        assert_eq!(app.list().names(), ["B", "C"]);
        assert_eq!(app.list().selected(), Some("C"));

        let stored = on_disk(&dir);
        assert_eq!(
            stored,
            vec![
                ("B".to_string(), "y".to_string()),
                ("C".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_rename_blocked_while_editing_or_cancelled() {
        let (_dir, mut app) = loaded_app(r#"{"A": "x"}"#);
        open(&mut app, "A");

        let mut ui = ScriptedDialogs::default();
        app.rename_current(&mut ui);
        assert_eq!(app.current_prompt(), Some("A"));

        app.toggle_edit(&mut ui);
        ui.rename_attempts = vec!["Z".into()];
        app.rename_current(&mut ui);
        assert_eq!(app.current_prompt(), Some("A"));
        assert_eq!(ui.rename_attempts, vec!["Z".to_string()]);
    }

    #[test]
    fn test_copy_current_prompt() {
        let (_dir, mut app) = loaded_app(r#"{"A": "Be concise."}"#);
        let mut clipboard = RecordingClipboard::default();
        let mut ui = ScriptedDialogs::default();

        app.copy_current(&mut ui, &mut clipboard);
        assert!(clipboard.contents.is_none());
        assert_eq!(ui.errors(), vec!["No prompt selected or prompt not found."]);

        open(&mut app, "A");
        app.copy_current(&mut ui, &mut clipboard);
        assert_eq!(
            clipboard.contents.as_deref(),
            Some("FOLLOW THIS SYSTEM PROMPT: [ Be concise. ] SYSTEM PROMPT OVER. ")
        );
    }

    #[test]
    fn test_copy_failure_is_reported() {
        let (_dir, mut app) = loaded_app(r#"{"A": "x"}"#);
        open(&mut app, "A");
        let mut clipboard = RecordingClipboard {
            broken: true,
            ..RecordingClipboard::default()
        };
        let mut ui = ScriptedDialogs::default();

        app.copy_current(&mut ui, &mut clipboard);
        assert_eq!(ui.errors(), vec!["No system clipboard is available"]);
    }

    #[test]
    fn test_delete_flow() {
        let (dir, mut app) = loaded_app(r#"{"A": "x", "B": "y"}"#);
        app.list_mut().select("A");

        let mut ui = ScriptedDialogs::confirming(&[false]);
        app.delete_selected(&mut ui);
        assert_eq!(app.store().unwrap().len(), 2);
        assert_eq!(app.list().selected(), Some("A"));

        let mut ui = ScriptedDialogs::confirming(&[true]);
        app.delete_selected(&mut ui);
        assert_eq!(app.list().names(), ["B"]);
        assert_eq!(app.list().selected(), None);
        assert!(!app.list().actions_enabled());
        assert_eq!(on_disk(&dir), vec![("B".to_string(), "y".to_string())]);
    }

    #[test]
    fn test_store_failure_is_reported_and_state_kept() {
        let (dir, mut app) = loaded_app(r#"{"A": "x"}"#);
        let path = dir.path().join(PROMPT_FILENAME);
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        app.list_mut().select("A");
        let mut ui = ScriptedDialogs::confirming(&[true]);
        app.delete_selected(&mut ui);

        assert_eq!(ui.notices.len(), 1);
        assert_eq!(ui.notices[0].1, "Storage Error");
        assert_eq!(app.list().names(), ["A"]);
        assert_eq!(app.list().selected(), Some("A"));
    }

    #[test]
    fn test_quit_confirmation() {
        let (_dir, mut app) = loaded_app(r#"{"A": "x"}"#);
        assert!(app.confirm_quit(&mut ScriptedDialogs::default()));

        open(&mut app, "A");
        app.toggle_edit(&mut ScriptedDialogs::default());
        type_into_body(&mut app, "!");
        assert!(!app.confirm_quit(&mut ScriptedDialogs::confirming(&[false])));
        assert!(app.confirm_quit(&mut ScriptedDialogs::confirming(&[true])));
    }
}
