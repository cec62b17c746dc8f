pub mod submission_handler;

pub use submission_handler::{
    __path_attach_photo, __path_create_report, __path_discard_draft, __path_get_draft,
    __path_next_step, __path_previous_step, __path_remove_photo, __path_select_category,
    __path_set_description, __path_set_location, __path_start_draft, __path_submit_draft,
    attach_photo, create_report, discard_draft, get_draft, next_step, previous_step,
    remove_photo, select_category, set_description, set_location, start_draft, submit_draft,
};
