pub mod flashcards;
pub mod grammar_panel;
pub mod header;
pub mod intro_screen;
pub mod progress_bar;
pub mod sentence_builder;
pub mod tour_overlay;
pub mod wave;
