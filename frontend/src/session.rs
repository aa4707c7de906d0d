//! 会话模块
//!
//! 管理登录会话（token + 已校验的用户），与路由系统解耦。
//! 路由服务通过注入的会话信号来检查认证状态。
//!
//! 不变量：`user` 非空当且仅当最近一次写入它的操作确实用当前 token
//! 通过了后端校验 —— 客户端从不凭一个未验证的 token 伪造用户。
//! 除 token 外不持久化任何数据。

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use leptos::prelude::*;
use send_wrapper::SendWrapper;
use pricedrop_shared::User;

use crate::api::PriceDropApi;
use crate::web::http::ApiError;
use crate::web::storage::{BrowserTokenStore, TokenStore};

/// 会话状态
#[derive(Clone, Default, PartialEq)]
pub struct SessionState {
    /// 会话 token（未登录时为空）
    pub token: Option<String>,
    /// 已通过后端校验的用户
    pub user: Option<User>,
    /// 是否正在从持久化存储恢复会话
    pub is_loading: bool,
}

impl SessionState {
    /// 进程启动时的初始状态：还不知道是否登录
    fn loading() -> Self {
        Self {
            token: None,
            user: None,
            is_loading: true,
        }
    }

    /// 未登录（且恢复已结束）
    fn empty() -> Self {
        Self::default()
    }

    /// 校验成功后的已认证状态
    fn authenticated(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            is_loading: false,
        }
    }
}

/// 用户校验接口
///
/// 会话逻辑只关心"用这个 token 能否取到当前用户"；
/// 具体的 HTTP 实现通过该接口注入，测试时替换成桩实现。
#[async_trait(?Send)]
pub trait UserFetcher {
    async fn fetch_current_user(&self, token: &str) -> Result<User, ApiError>;
}

/// 生产实现：走后端 `GET /auth/me`
pub struct ApiUserFetcher;

#[async_trait(?Send)]
impl UserFetcher for ApiUserFetcher {
    async fn fetch_current_user(&self, token: &str) -> Result<User, ApiError> {
        PriceDropApi::new(Some(token.to_string()))
            .get_current_user()
            .await
    }
}

struct SessionDeps {
    store: Box<dyn TokenStore>,
    fetcher: Box<dyn UserFetcher>,
    /// hydrate 每个进程最多执行一次
    hydrated: Cell<bool>,
    /// 世代计数：login/logout 都会递增；迟到的 login 完成回调
    /// 发现世代已变就整体丢弃，保证 logout 永远胜出
    epoch: Cell<u64>,
}

/// 会话上下文
///
/// 进程级单例，通过 Context 在组件间共享；所有状态变更都必须走
/// `hydrate` / `login` / `logout` 这三个入口。
#[derive(Clone)]
pub struct SessionContext {
    /// 会话状态（只读信号）
    pub state: ReadSignal<SessionState>,
    set_state: WriteSignal<SessionState>,
    deps: SendWrapper<Rc<SessionDeps>>,
}

impl SessionContext {
    /// 创建面向浏览器的会话上下文
    pub fn new() -> Self {
        Self::with_parts(Box::new(BrowserTokenStore), Box::new(ApiUserFetcher))
    }

    fn with_parts(store: Box<dyn TokenStore>, fetcher: Box<dyn UserFetcher>) -> Self {
        let (state, set_state) = signal(SessionState::loading());
        Self {
            state,
            set_state,
            deps: SendWrapper::new(Rc::new(SessionDeps {
                store,
                fetcher,
                hydrated: Cell::new(false),
                epoch: Cell::new(0),
            })),
        }
    }

    /// 会话恢复中信号（用于路由服务注入）
    pub fn is_loading_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_loading)
    }

    /// token 存在信号（用于路由服务注入）
    pub fn has_token_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().token.is_some())
    }

    /// 以当前 token 构造资源网关
    pub fn gateway(&self) -> PriceDropApi {
        PriceDropApi::new(self.state.get_untracked().token)
    }

    fn bump_epoch(&self) -> u64 {
        let next = self.deps.epoch.get() + 1;
        self.deps.epoch.set(next);
        next
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.deps.epoch.get() == epoch
    }

    /// 进程启动时从持久化存储恢复会话
    ///
    /// 没有持久化 token 就直接结束，不发任何网络请求；
    /// token 校验失败则清除持久化存储（下个进程也恢复为未登录）。
    /// 无论结果如何，结束时 `is_loading` 一定为 false。
    pub async fn hydrate(&self) {
        // 每个进程最多执行一次
        if self.deps.hydrated.replace(true) {
            return;
        }

        let Some(token) = self.deps.store.load() else {
            self.set_state.set(SessionState::empty());
            return;
        };

        let epoch = self.bump_epoch();
        match self.deps.fetcher.fetch_current_user(&token).await {
            Ok(user) => {
                if self.is_current(epoch) {
                    self.set_state.set(SessionState::authenticated(token, user));
                }
            }
            Err(_) => {
                // 过期或被服务端拒绝的 token 直接作废
                if self.is_current(epoch) {
                    self.deps.store.clear();
                    self.set_state.set(SessionState::empty());
                }
            }
        }
    }

    /// 用回调带回的 token 登录
    ///
    /// 先落盘、再校验；校验失败必须完整回滚（删除持久化 token、
    /// 清空内存状态），绝不留下一个没有对应已验证用户的 token。
    /// 失败会上抛给调用方（回调页据此跳回登录页）。
    pub async fn login(&self, token: String) -> Result<(), ApiError> {
        let epoch = self.bump_epoch();
        self.deps.store.save(&token);

        match self.deps.fetcher.fetch_current_user(&token).await {
            Ok(user) => {
                // 校验期间发生过 logout（或新的 login）时整体丢弃
                if self.is_current(epoch) {
                    self.set_state.set(SessionState::authenticated(token, user));
                }
                Ok(())
            }
            Err(err) => {
                if self.is_current(epoch) {
                    self.deps.store.clear();
                    self.set_state.set(SessionState::empty());
                }
                Err(err)
            }
        }
    }

    /// 注销并清除状态
    ///
    /// 同步完成、永不失败，不需要任何网络调用。
    /// 导航由路由服务监听会话状态变化自动处理。
    pub fn logout(&self) {
        self.bump_epoch();
        self.deps.store.clear();
        self.set_state.set(SessionState::empty());
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::future::Future;

    /// 共享内存实现：clone 之间共享同一份存储，
    /// 用同一个 store 新建上下文即可模拟"新进程"
    #[derive(Clone, Default)]
    struct MockTokenStore {
        value: Rc<RefCell<Option<String>>>,
    }

    impl TokenStore for MockTokenStore {
        fn load(&self) -> Option<String> {
            self.value.borrow().clone()
        }
        fn save(&self, token: &str) -> bool {
            *self.value.borrow_mut() = Some(token.to_string());
            true
        }
        fn clear(&self) -> bool {
            self.value.borrow_mut().take().is_some()
        }
    }

    /// 预置结果的桩实现，并记录调用次数
    struct StubFetcher {
        results: RefCell<VecDeque<Result<User, ApiError>>>,
        calls: Rc<Cell<usize>>,
    }

    impl StubFetcher {
        fn new(results: Vec<Result<User, ApiError>>) -> Self {
            Self {
                results: RefCell::new(results.into()),
                calls: Rc::new(Cell::new(0)),
            }
        }

        fn call_counter(&self) -> Rc<Cell<usize>> {
            Rc::clone(&self.calls)
        }
    }

    #[async_trait(?Send)]
    impl UserFetcher for StubFetcher {
        async fn fetch_current_user(&self, _token: &str) -> Result<User, ApiError> {
            self.calls.set(self.calls.get() + 1);
            self.results
                .borrow_mut()
                .pop_front()
                .expect("unexpected fetch_current_user call")
        }
    }

    /// 手动控制完成时机的实现，用于模拟仍在途的请求
    struct ManualFetcher {
        rx: RefCell<Option<oneshot::Receiver<Result<User, ApiError>>>>,
    }

    impl ManualFetcher {
        fn new(rx: oneshot::Receiver<Result<User, ApiError>>) -> Self {
            Self {
                rx: RefCell::new(Some(rx)),
            }
        }
    }

    #[async_trait(?Send)]
    impl UserFetcher for ManualFetcher {
        async fn fetch_current_user(&self, _token: &str) -> Result<User, ApiError> {
            let rx = self.rx.borrow_mut().take().expect("single fetch expected");
            rx.await.expect("sender dropped")
        }
    }

    fn make_user() -> User {
        User {
            id: 1,
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
            google_id: "g-1".to_string(),
            profile_picture: None,
            created_at: chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn rejected() -> ApiError {
        ApiError::Status {
            code: 401,
            detail: Some("Could not validate credentials".to_string()),
        }
    }

    #[tokio::test]
    async fn test_hydrate_without_token_issues_no_network_calls() {
        let store = MockTokenStore::default();
        let fetcher = StubFetcher::new(vec![]);
        let calls = fetcher.call_counter();
        let ctx = SessionContext::with_parts(Box::new(store), Box::new(fetcher));

        ctx.hydrate().await;

        let state = ctx.state.get_untracked();
        assert!(state.token.is_none());
        assert!(state.user.is_none());
        assert!(!state.is_loading);
        // 没有持久化 token 时不允许发请求
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_hydrate_with_valid_token_restores_session() {
        let store = MockTokenStore::default();
        store.save("tok-1");
        let ctx = SessionContext::with_parts(
            Box::new(store.clone()),
            Box::new(StubFetcher::new(vec![Ok(make_user())])),
        );

        ctx.hydrate().await;

        let state = ctx.state.get_untracked();
        assert_eq!(state.token.as_deref(), Some("tok-1"));
        assert_eq!(state.user.as_ref().map(|u| u.id), Some(1));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_hydrate_with_rejected_token_clears_storage() {
        let store = MockTokenStore::default();
        store.save("stale");
        let ctx = SessionContext::with_parts(
            Box::new(store.clone()),
            Box::new(StubFetcher::new(vec![Err(rejected())])),
        );

        ctx.hydrate().await;

        let state = ctx.state.get_untracked();
        assert!(state.token.is_none() && state.user.is_none() && !state.is_loading);
        assert_eq!(store.load(), None);

        // 模拟新进程：同一份存储、新的上下文，恢复后仍是未登录
        let fresh = SessionContext::with_parts(
            Box::new(store.clone()),
            Box::new(StubFetcher::new(vec![])),
        );
        fresh.hydrate().await;
        assert!(fresh.state.get_untracked().token.is_none());
    }

    #[tokio::test]
    async fn test_hydrate_runs_at_most_once() {
        let store = MockTokenStore::default();
        store.save("tok-1");
        let fetcher = StubFetcher::new(vec![Ok(make_user())]);
        let calls = fetcher.call_counter();
        let ctx = SessionContext::with_parts(Box::new(store), Box::new(fetcher));

        ctx.hydrate().await;
        ctx.hydrate().await;

        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_login_success_commits_token_and_user() {
        let store = MockTokenStore::default();
        let ctx = SessionContext::with_parts(
            Box::new(store.clone()),
            Box::new(StubFetcher::new(vec![Ok(make_user())])),
        );

        ctx.login("tok-9".to_string()).await.unwrap();

        let state = ctx.state.get_untracked();
        assert_eq!(state.token.as_deref(), Some("tok-9"));
        assert!(state.user.is_some());
        assert_eq!(store.load().as_deref(), Some("tok-9"));
    }

    #[tokio::test]
    async fn test_login_failure_rolls_back_persisted_token() {
        let store = MockTokenStore::default();
        let ctx = SessionContext::with_parts(
            Box::new(store.clone()),
            Box::new(StubFetcher::new(vec![Err(rejected())])),
        );

        let err = ctx.login("bad".to_string()).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { code: 401, .. }));

        let state = ctx.state.get_untracked();
        assert!(state.token.is_none() && state.user.is_none());
        // 模拟新进程：持久化存储里不能留下 token
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_logout_wins_over_in_flight_login() {
        let store = MockTokenStore::default();
        let (tx, rx) = oneshot::channel();
        let ctx = SessionContext::with_parts(
            Box::new(store.clone()),
            Box::new(ManualFetcher::new(rx)),
        );

        let waker = futures::task::noop_waker();
        let mut task_cx = std::task::Context::from_waker(&waker);

        // login 已经落盘并发出校验请求，但请求还没返回
        let mut login = Box::pin(ctx.login("tok-5".to_string()));
        assert!(login.as_mut().poll(&mut task_cx).is_pending());
        assert_eq!(store.load().as_deref(), Some("tok-5"));

        // 在途期间 logout：logout 必须胜出
        ctx.logout();

        // 之后校验成功返回，这个迟到的结果必须被整体丢弃
        tx.send(Ok(make_user())).expect("receiver alive");
        assert!(login.as_mut().poll(&mut task_cx).is_ready());

        let state = ctx.state.get_untracked();
        assert!(state.token.is_none() && state.user.is_none() && !state.is_loading);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_stale_login_failure_does_not_touch_newer_session() {
        let store = MockTokenStore::default();
        let (tx, rx) = oneshot::channel();
        let ctx = SessionContext::with_parts(
            Box::new(store.clone()),
            Box::new(ManualFetcher::new(rx)),
        );

        let waker = futures::task::noop_waker();
        let mut task_cx = std::task::Context::from_waker(&waker);

        let mut login = Box::pin(ctx.login("old".to_string()));
        assert!(login.as_mut().poll(&mut task_cx).is_pending());

        ctx.logout();
        // logout 之后用户又存了一个新 token（例如另一次登录的落盘阶段）
        store.save("newer");

        tx.send(Err(rejected())).expect("receiver alive");
        assert!(login.as_mut().poll(&mut task_cx).is_ready());

        // 迟到的失败回滚不能误删新 token
        assert_eq!(store.load().as_deref(), Some("newer"));
    }
}
