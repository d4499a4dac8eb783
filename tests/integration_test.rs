#[cfg(test)]
mod tests {
    use quiz_session_bot::*;
    use std::error::Error;
    use std::io::Write;
    use teloxide::types::{InlineKeyboardButtonKind, InlineKeyboardMarkup};
    use tempfile::NamedTempFile;
    use tokio::time::{sleep, Duration};

    // Helper function to create a test question
    fn create_test_question() -> Question {
        Question::multiple_choice(
            1,
            "What is the capital of France?",
            vec!["Paris".into(), "Rome".into(), "Berlin".into()],
            "A",
            10,
        )
        .unwrap()
    }

    fn create_test_quiz() -> Vec<Question> {
        vec![
            create_test_question(),
            Question::true_false(2, "Rust has a garbage collector", false, 5).unwrap(),
            Question::multiple_choice(
                3,
                "Which planet is closest to the Sun?",
                vec!["Mercury".into(), "Venus".into(), "Earth".into(), "Mars".into()],
                "A",
                10,
            )
            .unwrap(),
        ]
    }

    // Helper function to create a temporary CSV file with test questions
    fn create_test_csv(rows: &[&str]) -> Result<NamedTempFile, Box<dyn Error>> {
        let mut temp_file = NamedTempFile::new()?;

        writeln!(
            temp_file,
            "id,kind,question,correct_answer,option1,option2,option3,option4,points"
        )?;
        for row in rows {
            writeln!(temp_file, "{}", row)?;
        }

        Ok(temp_file)
    }

    fn callback_data(markup: &InlineKeyboardMarkup, row: usize) -> String {
        match &markup.inline_keyboard[row][0].kind {
            InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
            other => panic!("unexpected button kind: {:?}", other),
        }
    }

    #[test]
    fn test_load_questions() -> Result<(), Box<dyn Error>> {
        let file = create_test_csv(&[
            "1,multiple_choice,What is the capital of France?,Paris,Paris,London,Berlin,Madrid,10",
            "2,true_false,The Earth orbits the Sun.,true,,,,,",
        ])?;
        let questions = load_questions(file.path())?;

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text(), "What is the capital of France?");
        assert!(questions[0].check_answer("A"));
        assert_eq!(questions[0].points(), 10);
        assert!(questions[1].check_answer("true"));
        assert_eq!(questions[1].points(), 1);

        Ok(())
    }

    #[test]
    fn test_load_questions_rejects_bad_row() -> Result<(), Box<dyn Error>> {
        let file = create_test_csv(&["1,multiple_choice,Pick one,E,a,b,,,1"])?;
        let err = load_questions(file.path()).unwrap_err();
        assert!(matches!(err, QuizError::Configuration(_)));
        Ok(())
    }

    #[test]
    fn test_load_questions_missing_file() {
        let err = load_questions("does-not-exist.csv").unwrap_err();
        assert!(matches!(err, QuizError::CsvError(_)));
    }

    #[test]
    fn test_bundled_question_bank() -> Result<(), Box<dyn Error>> {
        let questions = load_questions(concat!(env!("CARGO_MANIFEST_DIR"), "/questions.csv"))?;
        assert_eq!(questions.len(), 8);
        assert!(questions[2].check_answer("B"));
        Ok(())
    }

    #[test]
    fn test_create_keyboard_initial() {
        let question = create_test_question();
        let keyboard = create_keyboard(&question.option_descriptors(), None, true);

        // 3 options + navigation row + end button
        assert_eq!(keyboard.inline_keyboard.len(), 5);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "A. Paris");
        assert_eq!(callback_data(&keyboard, 0), "answer:A");
        assert_eq!(keyboard.inline_keyboard[3].len(), 2);
        assert!(keyboard.inline_keyboard[4][0].text.contains("🛑"));

        for row in &keyboard.inline_keyboard[..3] {
            assert!(!row[0].text.contains('●'));
        }
    }

    #[test]
    fn test_create_keyboard_marks_single_selection() {
        let question = create_test_question();
        let keyboard = create_keyboard(&question.option_descriptors(), Some("B"), false);

        assert_eq!(keyboard.inline_keyboard.len(), 3);
        let marked: Vec<_> = keyboard
            .inline_keyboard
            .iter()
            .filter(|row| row[0].text.starts_with('●'))
            .collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0][0].text.contains("Rome"));
    }

    #[test]
    fn test_parse_callback() {
        assert_eq!(parse_callback("answer:true"), CallbackAction::Answer("true".into()));
        assert_eq!(parse_callback("nav:next"), CallbackAction::Next);
        assert_eq!(parse_callback("nav:prev"), CallbackAction::Previous);
        assert_eq!(parse_callback("end_quiz"), CallbackAction::End);
        assert_eq!(parse_callback("answer:"), CallbackAction::Unknown);
        assert_eq!(parse_callback("Paris"), CallbackAction::Unknown);
    }

    #[tokio::test]
    async fn test_draw_questions() {
        let config = QuizConfig {
            questions_per_quiz: 2,
            ..QuizConfig::default()
        };
        let state = BotState::new(create_test_quiz(), config);
        let drawn = state.draw_questions().await;
        assert_eq!(drawn.len(), 2);
        assert_ne!(drawn[0].id(), drawn[1].id());

        let state = BotState::new(create_test_quiz(), QuizConfig::default());
        assert_eq!(state.draw_questions().await.len(), 3);
    }

    #[tokio::test]
    async fn test_question_view() {
        let session = QuizSession::new(create_test_quiz(), 30).unwrap();
        session.start().await.unwrap();
        session.submit_answer("C").await.unwrap();

        let (text, keyboard) = question_view(&*session.state().await);
        assert!(text.starts_with("Question 1/3"));
        assert!(text.contains("What is the capital of France?"));
        assert!(keyboard.inline_keyboard[2][0].text.starts_with("● C."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_quiz_flow() {
        let session = QuizSession::new(create_test_quiz(), 10).unwrap();
        {
            let state = session.state().await;
            assert_eq!(state.total_points(), 25);
            assert_eq!(state.format_time_spent(), "00:00");
        }

        session.start().await.unwrap();
        assert!(session.submit_answer("A").await.unwrap());
        assert!(session.next_question().await.unwrap());

        assert!(!session.submit_answer("true").await.unwrap());
        assert!(session.submit_answer("false").await.unwrap());

        // Let the clock run out on the second question
        sleep(Duration::from_millis(10_500)).await;
        {
            let state = session.state().await;
            assert_eq!(state.current_question_index(), 2);
            assert_eq!(state.time_remaining(), 10);
            assert_eq!(state.option_descriptors().len(), 4);
        }

        assert!(!session.next_question().await.unwrap());
        session.end().await.unwrap();

        let state = session.state().await;
        assert_eq!(state.status(), SessionStatus::Ended);
        assert_eq!(state.score(), 15);
        assert_eq!(
            state.user_answers(),
            &[Some("A".to_string()), Some("false".to_string()), None]
        );
        assert_eq!(state.summary().answered, 2);
    }
}
