use std::sync::Arc;

use crate::codec::LocalFile;
use crate::common::{ClientCommand, ClientResult, CurrentUser, ProfileDraft};

use super::conversation::INVALID_IMAGE_NOTICE;
use super::notify::Notifier;
use super::preview::{Preview, PreviewBackend};
use super::state::{Navigator, Route, Submission};

/// What the avatar slot should show, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarSource<'a> {
    Preview(&'a str),
    Committed(&'a str),
    Placeholder,
}

/// Draft state of the profile form.
///
/// Created when the form is opened and dropped when it closes; dropping
/// releases any live image preview.
pub struct ProfileEditor {
    pub name: String,
    pub bio: String,
    image: Option<LocalFile>,
    preview: Option<Preview>,
    previews: Arc<dyn PreviewBackend>,
    submission: Submission,
}

impl ProfileEditor {
    pub fn new(user: Option<&CurrentUser>, previews: Arc<dyn PreviewBackend>) -> Self {
        Self {
            name: user.map(|u| u.full_name.clone()).unwrap_or_default(),
            bio: user.map(|u| u.bio.clone()).unwrap_or_default(),
            image: None,
            preview: None,
            previews,
            submission: Submission::Idle,
        }
    }

    pub fn selected_image(&self) -> Option<&LocalFile> {
        self.image.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission == Submission::Submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && !self.name.trim().is_empty() && !self.bio.trim().is_empty()
    }

    /// Replace (or clear) the pending avatar image.
    pub fn select_image(&mut self, file: Option<LocalFile>, notifier: &mut dyn Notifier) {
        if let Some(file) = &file {
            if !file.is_image() {
                notifier.notify_error(INVALID_IMAGE_NOTICE);
                return;
            }
        }

        // Release the old preview before the next one exists.
        drop(self.preview.take());
        self.preview = file
            .as_ref()
            .map(|file| Preview::acquire(&self.previews, file));
        self.image = file;
    }

    pub fn avatar<'a>(&'a self, user: Option<&'a CurrentUser>) -> AvatarSource<'a> {
        if let Some(preview) = &self.preview {
            return AvatarSource::Preview(preview.uri());
        }
        match user.and_then(|u| u.profile_pic.as_deref()) {
            Some(pic) => AvatarSource::Committed(pic),
            None => AvatarSource::Placeholder,
        }
    }

    pub fn submit(&mut self, notifier: &mut dyn Notifier) -> Option<ClientCommand> {
        if self.is_submitting() {
            return None;
        }
        // Blank fields are rejected; accepted values are sent as typed.
        if self.name.trim().is_empty() || self.bio.trim().is_empty() {
            notifier.notify_error("Name and bio are required");
            return None;
        }

        let draft = ProfileDraft {
            full_name: self.name.clone(),
            bio: self.bio.clone(),
            image: self.image.clone(),
        };
        self.submission = Submission::Submitting;
        Some(ClientCommand::UpdateProfile(draft))
    }

    /// Finish a submission. Returns the committed user on success.
    pub fn apply_update(
        &mut self,
        result: ClientResult<CurrentUser>,
        notifier: &mut dyn Notifier,
        navigator: &mut dyn Navigator,
    ) -> Option<CurrentUser> {
        self.submission = Submission::Idle;
        match result {
            Ok(user) => {
                notifier.notify_info("Profile updated");
                navigator.go_to(Route::Chat);
                Some(user)
            }
            Err(err) => {
                log::error!("Profile update failed: {err}");
                notifier.notify_error(&format!("Profile update failed: {err}"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ClientError;
    use crate::ui::notify::testing::Recorder;
    use crate::ui::preview::testing::RecordingPreviews;
    use crate::ui::state::Router;

    fn user() -> CurrentUser {
        CurrentUser {
            id: "me".into(),
            full_name: "Ann Lee".into(),
            bio: "Hello there".into(),
            profile_pic: Some("https://cdn.example/ann.png".into()),
            email: None,
        }
    }

    fn editor(recorder: &Arc<RecordingPreviews>) -> ProfileEditor {
        let previews: Arc<dyn PreviewBackend> = recorder.clone();
        ProfileEditor::new(Some(&user()), previews)
    }

    #[test]
    fn draft_is_seeded_from_current_user() {
        let recorder = Arc::new(RecordingPreviews::default());
        let form = editor(&recorder);
        assert_eq!(form.name, "Ann Lee");
        assert_eq!(form.bio, "Hello there");

        let empty = ProfileEditor::new(None, recorder.clone());
        assert_eq!(empty.name, "");
        assert_eq!(empty.bio, "");
    }

    #[test]
    fn replacing_an_image_releases_the_previous_preview_first() {
        let recorder = Arc::new(RecordingPreviews::default());
        let mut form = editor(&recorder);
        let mut notes = Recorder::default();

        form.select_image(Some(LocalFile::from_path("/tmp/f1.png")), &mut notes);
        form.select_image(Some(LocalFile::from_path("/tmp/f2.jpg")), &mut notes);
        assert_eq!(
            recorder.log(),
            vec![
                "create preview://1/f1.png",
                "release preview://1/f1.png",
                "create preview://2/f2.jpg",
            ]
        );
        assert_eq!(recorder.live(), 1);

        form.select_image(None, &mut notes);
        assert_eq!(recorder.live(), 0);
        assert!(form.selected_image().is_none());
    }

    #[test]
    fn closing_the_form_releases_the_preview() {
        let recorder = Arc::new(RecordingPreviews::default());
        let mut form = editor(&recorder);
        form.select_image(
            Some(LocalFile::from_path("/tmp/f1.png")),
            &mut Recorder::default(),
        );
        drop(form);
        assert_eq!(recorder.live(), 0);
    }

    #[test]
    fn non_image_selection_keeps_current_preview() {
        let recorder = Arc::new(RecordingPreviews::default());
        let mut form = editor(&recorder);
        let mut notes = Recorder::default();

        form.select_image(Some(LocalFile::from_path("/tmp/f1.png")), &mut notes);
        form.select_image(Some(LocalFile::from_path("/tmp/resume.pdf")), &mut notes);

        assert_eq!(notes.errors.len(), 1);
        assert_eq!(recorder.live(), 1);
        assert_eq!(form.selected_image().unwrap().name, "f1.png");
    }

    #[test]
    fn preview_takes_priority_over_committed_avatar() {
        let recorder = Arc::new(RecordingPreviews::default());
        let mut form = editor(&recorder);
        let committed = user();

        assert_eq!(
            form.avatar(Some(&committed)),
            AvatarSource::Committed("https://cdn.example/ann.png")
        );
        assert_eq!(form.avatar(None), AvatarSource::Placeholder);

        form.select_image(
            Some(LocalFile::from_path("/tmp/new.png")),
            &mut Recorder::default(),
        );
        assert_eq!(
            form.avatar(Some(&committed)),
            AvatarSource::Preview("preview://1/new.png")
        );
    }

    #[test]
    fn submit_without_image_carries_only_name_and_bio() {
        let recorder = Arc::new(RecordingPreviews::default());
        let mut form = editor(&recorder);
        let command = form.submit(&mut Recorder::default());
        assert_eq!(
            command,
            Some(ClientCommand::UpdateProfile(ProfileDraft {
                full_name: "Ann Lee".into(),
                bio: "Hello there".into(),
                image: None,
            }))
        );
        assert!(form.is_submitting());
        assert!(!form.can_submit());
        assert!(form.submit(&mut Recorder::default()).is_none());
    }

    #[test]
    fn submitted_fields_keep_their_whitespace() {
        let recorder = Arc::new(RecordingPreviews::default());
        let mut form = editor(&recorder);
        form.name = " Ann Lee ".into();
        form.bio = "line one\nline two\n".into();

        match form.submit(&mut Recorder::default()) {
            Some(ClientCommand::UpdateProfile(draft)) => {
                assert_eq!(draft.full_name, " Ann Lee ");
                assert_eq!(draft.bio, "line one\nline two\n");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn submit_with_image_carries_the_file() {
        let recorder = Arc::new(RecordingPreviews::default());
        let mut form = editor(&recorder);
        let file = LocalFile::from_path("/tmp/me.png");
        form.select_image(Some(file.clone()), &mut Recorder::default());

        match form.submit(&mut Recorder::default()) {
            Some(ClientCommand::UpdateProfile(draft)) => assert_eq!(draft.image, Some(file)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn empty_name_or_bio_is_not_submitted() {
        let recorder = Arc::new(RecordingPreviews::default());
        let mut form = editor(&recorder);
        let mut notes = Recorder::default();

        form.name = "   ".into();
        assert!(form.submit(&mut notes).is_none());
        form.name = "Ann".into();
        form.bio = String::new();
        assert!(form.submit(&mut notes).is_none());

        assert_eq!(notes.errors.len(), 2);
        assert!(!form.is_submitting());
    }

    #[test]
    fn success_navigates_and_returns_committed_user() {
        let recorder = Arc::new(RecordingPreviews::default());
        let mut form = editor(&recorder);
        let mut notes = Recorder::default();
        let mut router = Router::default();
        router.go_to(Route::Profile);

        form.submit(&mut notes);
        let committed = form.apply_update(Ok(user()), &mut notes, &mut router);

        assert_eq!(committed, Some(user()));
        assert_eq!(router.current(), Route::Chat);
        assert!(!form.is_submitting());
    }

    #[test]
    fn failure_stays_on_the_form() {
        let recorder = Arc::new(RecordingPreviews::default());
        let mut form = editor(&recorder);
        let mut notes = Recorder::default();
        let mut router = Router::default();
        router.go_to(Route::Profile);

        form.submit(&mut notes);
        let committed = form.apply_update(
            Err(ClientError::Rejected("too big".into())),
            &mut notes,
            &mut router,
        );

        assert!(committed.is_none());
        assert_eq!(router.current(), Route::Profile);
        assert!(!form.is_submitting());
        assert!(form.can_submit());
        assert_eq!(notes.errors, vec!["Profile update failed: too big"]);
    }
}
