//! 提交控制器 - 流程层
//!
//! 持有状态机，执行其副作用（上传、创建、延时清空），并把异步结果送回状态机。
//!
//! 所有状态转换都在 `&mut self` 方法中完成，两次挂起之间是原子的；
//! 异步任务只通过通道回传结果，不触碰状态。

use super::intent::{Event, Intent};
use super::machine::{Effect, SubmissionMachine};
use super::state::{FormState, SubmissionPhase};
use crate::api::{Collection, RemoteApi};
use crate::config::Config;
use crate::error::{ApiError, AppError};
use crate::models::Item;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::debug;

const HISTORY_LIMIT: usize = 64;

/// 新建物品表单的控制器
pub struct SubmissionController<A> {
    api: Arc<A>,
    machine: SubmissionMachine,
    success_delay: Duration,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    /// 已派发、结果尚未处理的异步操作数
    outstanding: usize,
    snapshot: watch::Sender<FormState>,
    history: VecDeque<SubmissionPhase>,
}

impl<A> SubmissionController<A>
where
    A: RemoteApi + 'static,
{
    pub fn new(api: Arc<A>, config: &Config) -> Self {
        Self::with_success_delay(api, config.success_reset_delay())
    }

    pub fn with_success_delay(api: Arc<A>, success_delay: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot, _) = watch::channel(FormState::default());
        Self {
            api,
            machine: SubmissionMachine::new(),
            success_delay,
            events_tx,
            events_rx,
            outstanding: 0,
            snapshot,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    /// 收藏标记需要当前登录用户
    pub fn set_current_user(&mut self, user_id: Option<u64>) {
        self.machine.set_current_user(user_id);
    }

    /// 只读的表单快照
    pub fn form_state(&self) -> &FormState {
        self.machine.form()
    }

    /// 订阅表单变化（展示层使用）
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.snapshot.subscribe()
    }

    /// 最近进入过的阶段，按时间顺序
    pub fn phase_history(&self) -> Vec<SubmissionPhase> {
        self.history.iter().copied().collect()
    }

    pub fn last_created(&self) -> Option<&Item> {
        self.machine.last_created()
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn dispatch(&mut self, intent: Intent) {
        self.apply(Event::Intent(intent));
    }

    /// 等待并处理下一个异步结果
    ///
    /// 没有进行中的操作时立即返回 `false`
    pub async fn process_next(&mut self) -> bool {
        if self.outstanding == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.outstanding -= 1;
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// 在条件成立且仍有进行中的操作时持续处理结果
    pub async fn run_while(&mut self, mut condition: impl FnMut(&FormState) -> bool) {
        while condition(self.machine.form()) && self.process_next().await {}
    }

    /// 等待当前图片上传结束
    pub async fn wait_for_upload(&mut self) {
        self.run_while(FormState::is_uploading).await;
    }

    /// 等待创建请求返回
    pub async fn wait_for_outcome(&mut self) {
        self.run_while(|state| state.phase == SubmissionPhase::Creating)
            .await;
    }

    /// 处理完所有进行中的操作（包括成功后的延时清空）
    pub async fn settle(&mut self) {
        while self.process_next().await {}
    }

    fn apply(&mut self, event: Event) {
        let step = self.machine.handle(event);

        for phase in step.entered {
            if self.history.len() == HISTORY_LIMIT {
                self.history.pop_front();
            }
            self.history.push_back(phase);
        }
        for effect in step.effects {
            self.spawn_effect(effect);
        }

        self.snapshot.send_replace(self.machine.form().clone());
    }

    fn spawn_effect(&mut self, effect: Effect) {
        self.outstanding += 1;
        let events = self.events_tx.clone();

        match effect {
            Effect::Upload(blob) => {
                let api = Arc::clone(&self.api);
                tokio::spawn(async move {
                    let outcome = api
                        .upload_binary(&blob)
                        .await
                        .map_err(|e| failure_message(&e));
                    // 控制器已被丢弃时结果无人关心
                    let _ = events.send(Event::UploadSettled {
                        blob: blob.id(),
                        outcome,
                    });
                });
            }
            Effect::Create { submission, draft } => {
                let api = Arc::clone(&self.api);
                tokio::spawn(async move {
                    let payload = draft.to_payload();
                    let outcome = api
                        .create_record::<Item>(Collection::Items, &payload)
                        .await
                        .map_err(|e| failure_message(&e));
                    let _ = events.send(Event::CreateSettled { submission, outcome });
                });
            }
            Effect::ScheduleSuccessClear { epoch } => {
                let delay = self.success_delay;
                debug!("{:?} 后清空表单", delay);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events.send(Event::SuccessDisplayElapsed { epoch });
                });
            }
        }
    }
}

/// 展示给用户的失败原因：优先使用服务端的提示
fn failure_message(error: &AppError) -> String {
    match error {
        AppError::Api(ApiError::BadResponse { message, .. }) => message.clone(),
        other => other.to_string(),
    }
}
