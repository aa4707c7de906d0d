//! 页面骨架：顶栏 + 内容区
//!
//! 顶栏展示产品标识、当前用户头像与退出按钮，
//! 所有受保护页面共用。

use leptos::prelude::*;

use crate::components::icons::{LogOut, Tag};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn PageShell(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Header />
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">{children()}</main>
        </div>
    }
}

#[component]
fn Header() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let state = session.state;

    let display_name = move || {
        state
            .get()
            .user
            .map(|u| u.display_name().to_string())
            .unwrap_or_default()
    };
    let avatar_url = move || state.get().user.and_then(|u| u.profile_picture);

    let on_logout = move |_| {
        session.logout();
        router.navigate(AppRoute::auth_failure_redirect());
    };

    view! {
        <div class="navbar bg-base-100 shadow-md px-4 md:px-8">
            <div class="flex-1 gap-2">
                <button
                    class="btn btn-ghost text-xl gap-2"
                    on:click=move |_| router.navigate(AppRoute::Dashboard)
                >
                    <Tag attr:class="h-6 w-6 text-primary" />
                    "PriceDrop"
                </button>
            </div>
            <div class="flex-none gap-3 items-center">
                <Show when=move || avatar_url().is_some()>
                    <div class="avatar">
                        <div class="w-9 rounded-full">
                            <img src=move || avatar_url().unwrap() alt="avatar" />
                        </div>
                    </div>
                </Show>
                <span class="hidden md:inline text-sm text-base-content/70">{display_name}</span>
                <button on:click=on_logout class="btn btn-ghost btn-sm gap-2">
                    <LogOut attr:class="h-4 w-4" /> "退出登录"
                </button>
            </div>
        </div>
    }
}
