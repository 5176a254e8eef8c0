//! 提交状态机 - 纯状态转换
//!
//! 不做任何 IO：每个事件产生新状态以及需要执行的副作用（[`Effect`]），
//! 由 [`super::SubmissionController`] 负责执行副作用并把结果作为事件送回。
//!
//! ```text
//! Idle ─select─▶ Uploading ─settled─▶ Idle ─submit─▶ Validating ─ok─▶ Creating ─▶ Succeeded ─delay─▶ Idle
//!                                                         │                      └─▶ Failed ─edit─▶ Idle
//!                                                         └─invalid─▶ Idle / Uploading
//! ```

use super::draft::ItemDraft;
use super::intent::{Event, FieldEdit, Intent};
use super::state::{FormError, FormState, SubmissionPhase, ValidationError};
use crate::api::{BlobId, PhotoBlob, UploadedFile};
use crate::models::Item;
use tracing::{debug, info, warn};

/// 需要控制器执行的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Upload(PhotoBlob),
    Create { submission: u64, draft: ItemDraft },
    /// 成功提示展示一段时间后清空表单
    ScheduleSuccessClear { epoch: u64 },
}

/// 处理一个事件的结果
#[derive(Debug, Default)]
pub struct Step {
    pub effects: Vec<Effect>,
    /// 按顺序进入过的阶段
    pub entered: Vec<SubmissionPhase>,
}

/// 提交状态机
#[derive(Debug, Default)]
pub struct SubmissionMachine {
    form: FormState,
    current_user: Option<u64>,
    /// 仍在上传且结果仍有意义的图片
    pending_upload: Option<BlobId>,
    /// 正在进行的创建请求
    creating: Option<u64>,
    /// 最近一次提交时草稿里的图片
    submitted_photo: Option<BlobId>,
    next_submission: u64,
    /// 每次清空表单都会递增，过期的定时事件据此丢弃
    clear_epoch: u64,
    last_created: Option<Item>,
}

impl SubmissionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn set_current_user(&mut self, user_id: Option<u64>) {
        self.current_user = user_id;
    }

    pub fn last_created(&self) -> Option<&Item> {
        self.last_created.as_ref()
    }

    pub fn upload_in_flight(&self) -> Option<BlobId> {
        self.pending_upload
    }

    pub fn handle(&mut self, event: Event) -> Step {
        let mut step = Step::default();
        match event {
            Event::Intent(intent) => self.on_intent(intent, &mut step),
            Event::UploadSettled { blob, outcome } => self.on_upload_settled(blob, outcome, &mut step),
            Event::CreateSettled { submission, outcome } => {
                self.on_create_settled(submission, outcome, &mut step)
            }
            Event::SuccessDisplayElapsed { epoch } => {
                if self.form.phase == SubmissionPhase::Succeeded && epoch == self.clear_epoch {
                    self.clear_after_success(&mut step);
                }
            }
        }
        step
    }

    fn on_intent(&mut self, intent: Intent, step: &mut Step) {
        match intent {
            Intent::Reset => {
                debug!("重置表单 (阶段: {})", self.form.phase);
                self.clear(step);
            }
            Intent::Submit => self.submit(step),
            Intent::SelectPhoto(blob) => {
                self.flush_success(step);
                self.select_photo(blob, step);
            }
            Intent::EditField(edit) => {
                self.flush_success(step);
                self.supersede_failure(step);
                match edit {
                    FieldEdit::Name(name) => self.form.name = name,
                    FieldEdit::Description(description) => self.form.description = description,
                    FieldEdit::ItemType(item_type) => self.form.item_type = item_type,
                }
                if matches!(self.form.last_error, Some(FormError::Validation(ValidationError::NameRequired)))
                    && !self.form.name.trim().is_empty()
                {
                    self.form.last_error = None;
                }
            }
            Intent::ToggleFavorite => {
                self.flush_success(step);
                self.supersede_failure(step);
                self.form.favorite = !self.form.favorite;
            }
        }
    }

    fn select_photo(&mut self, blob: PhotoBlob, step: &mut Step) {
        let id = blob.id();
        if self.pending_upload == Some(id) && self.form.selected_photo.as_ref() == Some(&blob) {
            debug!("图片 {} 已在上传中", id);
            return;
        }
        debug!("选择图片 {} ({})", id, blob.file_name());

        if matches!(
            self.form.last_error,
            Some(FormError::Upload(_))
                | Some(FormError::Validation(
                    ValidationError::PhotoUploadFailed | ValidationError::PhotoStillUploading
                ))
        ) || self.form.phase == SubmissionPhase::Failed
        {
            self.form.last_error = None;
        }

        self.form.selected_photo = Some(blob.clone());
        self.form.uploaded_photo_id = None;
        self.pending_upload = Some(id);

        // 创建请求的载荷已经确定，阶段保持 Creating
        if self.form.phase != SubmissionPhase::Creating {
            self.enter(SubmissionPhase::Uploading(id), step);
        }
        step.effects.push(Effect::Upload(blob));
    }

    fn submit(&mut self, step: &mut Step) {
        match self.form.phase {
            SubmissionPhase::Creating | SubmissionPhase::Validating => {
                debug!("已有提交在进行中，忽略本次提交");
                return;
            }
            SubmissionPhase::Uploading(_) => {
                if let Err(error) = self.validate() {
                    warn!("⚠️ 提交被拒绝: {}", error);
                    self.form.last_error = Some(FormError::Validation(error));
                }
                return;
            }
            SubmissionPhase::Succeeded => self.flush_success(step),
            SubmissionPhase::Idle | SubmissionPhase::Failed => {}
        }

        self.form.last_error = None;
        self.enter(SubmissionPhase::Validating, step);

        if let Err(error) = self.validate() {
            warn!("⚠️ 提交被拒绝: {}", error);
            self.form.last_error = Some(FormError::Validation(error));
            let resting = self.resting_phase();
            self.enter(resting, step);
            return;
        }

        let submission = self.next_submission;
        self.next_submission += 1;
        self.creating = Some(submission);
        self.submitted_photo = self.form.selected_photo.as_ref().map(PhotoBlob::id);

        let draft = ItemDraft::from_form(&self.form, self.current_user);
        info!("📤 提交物品: {}", draft.name);
        self.enter(SubmissionPhase::Creating, step);
        step.effects.push(Effect::Create { submission, draft });
    }

    /// 名称校验优先于图片校验
    fn validate(&self) -> Result<(), ValidationError> {
        if self.form.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if self.form.selected_photo.is_some() && self.form.uploaded_photo_id.is_none() {
            return Err(if self.pending_upload.is_some() {
                ValidationError::PhotoStillUploading
            } else {
                ValidationError::PhotoUploadFailed
            });
        }
        Ok(())
    }

    fn on_upload_settled(&mut self, blob: BlobId, outcome: Result<UploadedFile, String>, step: &mut Step) {
        if self.pending_upload == Some(blob) {
            self.pending_upload = None;
        }

        let current = self.form.selected_photo.as_ref().map(PhotoBlob::id);
        if current != Some(blob) {
            debug!("丢弃过期的上传结果 {} (当前: {:?})", blob, current);
            return;
        }

        match outcome {
            Ok(file) => {
                info!("✓ 图片上传成功 {} → id {}", blob, file.id);
                self.form.uploaded_photo_id = Some(file.id);
                if matches!(
                    self.form.last_error,
                    Some(FormError::Upload(_))
                        | Some(FormError::Validation(
                            ValidationError::PhotoUploadFailed | ValidationError::PhotoStillUploading
                        ))
                ) {
                    self.form.last_error = None;
                }
            }
            Err(message) => {
                warn!("⚠️ 图片上传失败 {}: {}", blob, message);
                self.form.uploaded_photo_id = None;
                self.form.last_error = Some(FormError::Upload(message));
            }
        }

        if self.form.phase == SubmissionPhase::Uploading(blob) {
            self.enter(SubmissionPhase::Idle, step);
        }
    }

    fn on_create_settled(&mut self, submission: u64, outcome: Result<Item, String>, step: &mut Step) {
        if self.creating != Some(submission) {
            debug!("丢弃已放弃的提交结果 #{}", submission);
            return;
        }
        self.creating = None;

        match outcome {
            Ok(item) => {
                info!("✓ 物品创建成功: {} ({})", item.display_name(), item.document_id);
                self.last_created = Some(item);
                self.clear_epoch += 1;
                self.enter(SubmissionPhase::Succeeded, step);
                step.effects.push(Effect::ScheduleSuccessClear {
                    epoch: self.clear_epoch,
                });
            }
            Err(message) => {
                warn!("⚠️ 物品创建失败: {}", message);
                self.form.last_error = Some(FormError::Create(message));
                self.enter(SubmissionPhase::Failed, step);
            }
        }
    }

    /// 成功提示期间的任何操作都先清空已提交的草稿
    fn flush_success(&mut self, step: &mut Step) {
        if self.form.phase == SubmissionPhase::Succeeded {
            self.clear_after_success(step);
        }
    }

    /// 清空已提交的草稿；提交之后才选择的图片留给下一份草稿
    fn clear_after_success(&mut self, step: &mut Step) {
        let carried = self
            .form
            .selected_photo
            .take()
            .filter(|photo| Some(photo.id()) != self.submitted_photo);
        let uploaded_photo_id = self.form.uploaded_photo_id;
        let pending_upload = self.pending_upload;
        let upload_error = self
            .form
            .last_error
            .take()
            .filter(|error| matches!(error, FormError::Upload(_)));

        self.clear(step);

        if let Some(photo) = carried {
            let id = photo.id();
            debug!("保留提交后选择的图片 {}", id);
            self.form.selected_photo = Some(photo);
            self.form.uploaded_photo_id = uploaded_photo_id;
            self.form.last_error = upload_error;
            self.pending_upload = pending_upload.filter(|pending| *pending == id);
            if self.pending_upload.is_some() {
                self.enter(SubmissionPhase::Uploading(id), step);
            }
        }
    }

    fn supersede_failure(&mut self, step: &mut Step) {
        if self.form.phase == SubmissionPhase::Failed {
            self.form.last_error = None;
            let resting = self.resting_phase();
            self.enter(resting, step);
        }
    }

    /// 回到空白表单，放弃（不取消）进行中的请求
    fn clear(&mut self, step: &mut Step) {
        let phase = self.form.phase;
        self.form = FormState {
            phase,
            ..FormState::default()
        };
        self.pending_upload = None;
        self.creating = None;
        self.submitted_photo = None;
        self.clear_epoch += 1;
        self.enter(SubmissionPhase::Idle, step);
    }

    fn resting_phase(&self) -> SubmissionPhase {
        match self.pending_upload {
            Some(blob) => SubmissionPhase::Uploading(blob),
            None => SubmissionPhase::Idle,
        }
    }

    fn enter(&mut self, phase: SubmissionPhase, step: &mut Step) {
        if self.form.phase == phase {
            return;
        }
        debug!("阶段 {} → {}", self.form.phase, phase);
        self.form.phase = phase;
        step.entered.push(phase);
    }
}
