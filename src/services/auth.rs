//! Login, registration and logout

use std::sync::Arc;

use crate::{
    api::LibraryApi,
    error::{AppError, AppResult},
    models::{user::UserProfile, Session},
};

use super::{
    forms::{FormFlow, LoginForm, RegisterForm},
    session::SessionContext,
};

pub const REGISTER_SUCCESS_MESSAGE: &str = "Registrasi berhasil, silakan login";

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn LibraryApi>,
    session: SessionContext,
    login_form: Arc<FormFlow>,
    register_form: Arc<FormFlow>,
}

impl AuthService {
    pub fn new(api: Arc<dyn LibraryApi>, session: SessionContext) -> Self {
        Self {
            api,
            session,
            login_form: Arc::new(FormFlow::new("login")),
            register_form: Arc::new(FormFlow::new("register")),
        }
    }

    pub fn login_form(&self) -> &FormFlow {
        &self.login_form
    }

    pub fn register_form(&self) -> &FormFlow {
        &self.register_form
    }

    /// Authenticate and persist the resulting session
    pub async fn login(&self, form: &LoginForm) -> AppResult<Session> {
        let request = form.to_request();

        self.login_form
            .submit(
                || form.check(),
                || async {
                    let response = self.api.login(&request).await?;
                    let token = match response.token {
                        Some(token) if response.success && !token.is_empty() => token,
                        _ => {
                            return Err(AppError::Server {
                                status: 200,
                                message: response
                                    .message
                                    .unwrap_or_else(|| "Login gagal".to_string()),
                            })
                        }
                    };
                    let profile = UserProfile::try_from(response.data.unwrap_or_default())?;
                    self.session.update(token, profile)
                },
                |_| "Login berhasil".to_string(),
            )
            .await?;

        let session = self.session.current();
        tracing::info!(
            "Signed in as {} ({})",
            session.user.email,
            session.user.role
        );
        Ok(session)
    }

    /// Register a new member; returns the confirmation to show on the login
    /// screen
    pub async fn register(&self, form: &RegisterForm) -> AppResult<String> {
        let request = form.to_request();

        let message = self
            .register_form
            .submit(
                || form.check(),
                || self.api.register(&request),
                |message| {
                    message
                        .clone()
                        .unwrap_or_else(|| REGISTER_SUCCESS_MESSAGE.to_string())
                },
            )
            .await?;

        tracing::info!("Registered {}", request.email);
        Ok(message.unwrap_or_else(|| REGISTER_SUCCESS_MESSAGE.to_string()))
    }

    /// Forget the session locally; the server is not contacted
    pub fn logout(&self) -> AppResult<()> {
        self.session.clear()?;
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}
