pub mod history_table;
pub mod progress_bar;
pub mod question_card;
pub mod result_panel;
pub mod review_list;
pub mod start_menu;
