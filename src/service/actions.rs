//! Writes behind the list screens. Every input is validated before anything
//! is sent, and is only borrowed so a rejected form can be resubmitted.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use validator::{Validate, ValidationError};

use crate::erx::{Erx, ResultE};
use crate::fetcher::{Access, Fetcher};
use crate::model::category::CategoryName;
use crate::model::course::NewCourse;
use crate::model::lecture::{NewLecture, NewTopic};
use crate::model::{Category, Course, Lecture, Topic};
use crate::web::session::Session;
use crate::web::url::segment;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter your password"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[validate(length(min = 1, message = "Please enter your Name"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(custom(function = "phone_number"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "Please enter your Password"))]
    pub password: String,
    #[serde(skip_serializing)]
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

fn phone_number(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().all(|c| c.is_ascii_digit());
    if digits && (10..=15).contains(&value.len()) {
        return Ok(());
    }
    Err(ValidationError::new("phone").with_message("Please enter a valid phone number".into()))
}

fn check<T: Validate>(input: &T) -> ResultE<()> {
    input.validate().map_err(Erx::from)
}

/// Pick the created document out of `{ key: {..} }` or take the body as is.
fn document<T: DeserializeOwned>(value: Value, key: &str) -> ResultE<T> {
    let value = match value {
        Value::Object(mut map) if map.get(key).map(Value::is_object).unwrap_or(false) => {
            map.remove(key).unwrap_or_default()
        },
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}

async fn post<B>(fetcher: &Fetcher, access: Access, path: &str, body: &B) -> ResultE<Value>
where
    B: Serialize + ?Sized,
{
    let token = fetcher.authorize(access)?;
    fetcher.client().post_valued(path, token.as_deref(), body).await
}

async fn put<B>(fetcher: &Fetcher, access: Access, path: &str, body: &B) -> ResultE<Value>
where
    B: Serialize + ?Sized,
{
    let token = fetcher.authorize(access)?;
    fetcher.client().put_valued(path, token.as_deref(), body).await
}

async fn delete(fetcher: &Fetcher, access: Access, path: &str) -> ResultE<Value> {
    let token = fetcher.authorize(access)?;
    fetcher.client().delete_valued(path, token.as_deref()).await
}

/// `POST /auth/login`. The caller stores the returned session.
pub async fn login(fetcher: &Fetcher, credentials: &Credentials) -> ResultE<Session> {
    check(credentials)?;
    let value = post(fetcher, Access::Public, "/auth/login", credentials).await?;
    let mut session: Session = document(value, "user")?;
    if session.token.trim().is_empty() {
        return Err(Erx::auth("No token returned from the server"));
    }
    session.is_logged_in = true;
    info!("signed in as {} ({})", session.email, session.role);
    Ok(session)
}

/// `POST /auth/register`. The new account still has to sign in.
pub async fn register(fetcher: &Fetcher, registration: &Registration) -> ResultE<()> {
    check(registration)?;
    let value = post(fetcher, Access::Public, "/auth/register", registration).await?;
    match value.get("token").and_then(Value::as_str) {
        Some(token) if !token.is_empty() => Ok(()),
        _ => Err(Erx::auth("No token returned from the server")),
    }
}

pub async fn create_category(fetcher: &Fetcher, name: &str) -> ResultE<Category> {
    let body = CategoryName::new(name);
    check(&body)?;
    let value = post(fetcher, Access::Admin, "/categories", &body).await?;
    document(value, "category")
}

pub async fn update_category(fetcher: &Fetcher, id: &str, name: &str) -> ResultE<Category> {
    let body = CategoryName::new(name);
    check(&body)?;
    let value = put(fetcher, Access::Admin, &format!("/categories/{}", segment(id)), &body).await?;
    document(value, "category")
}

pub async fn delete_category(fetcher: &Fetcher, id: &str) -> ResultE<()> {
    delete(fetcher, Access::Admin, &format!("/categories/{}", segment(id))).await?;
    Ok(())
}

pub async fn create_course(fetcher: &Fetcher, draft: &NewCourse) -> ResultE<Course> {
    let body = draft.normalized();
    check(&body)?;
    let value = post(fetcher, Access::Bearer, "/courses", &body).await?;
    document(value, "course")
}

pub async fn add_lecture(
    fetcher: &Fetcher,
    course_id: &str,
    lecture: &NewLecture,
) -> ResultE<Lecture> {
    check(lecture)?;
    let path = format!("/courses/{}/lectures", segment(course_id));
    let value = post(fetcher, Access::Bearer, &path, lecture).await?;
    document(value, "lecture")
}

pub async fn add_topic(fetcher: &Fetcher, lecture_id: &str, topic: &NewTopic) -> ResultE<Topic> {
    check(topic)?;
    let path = format!("/lectures/{}/topics", segment(lecture_id));
    let value = post(fetcher, Access::Bearer, &path, topic).await?;
    document(value, "topic")
}

/// `DELETE /lectures/:id`, from the instructor's lecture list.
pub async fn delete_lecture(fetcher: &Fetcher, lecture_id: &str) -> ResultE<()> {
    delete(fetcher, Access::Bearer, &format!("/lectures/{}", segment(lecture_id))).await?;
    Ok(())
}

pub async fn delete_topic(fetcher: &Fetcher, topic_id: &str) -> ResultE<()> {
    delete(fetcher, Access::Bearer, &format!("/topics/{}", segment(topic_id))).await?;
    Ok(())
}

pub async fn complete_topic(fetcher: &Fetcher, lecture_id: &str, topic_id: &str) -> ResultE<()> {
    let path = format!("/lectures/{}/topics/{}/complete", segment(lecture_id), segment(topic_id));
    post(fetcher, Access::Bearer, &path, &serde_json::json!({})).await?;
    Ok(())
}

pub async fn enroll(fetcher: &Fetcher, course_id: &str) -> ResultE<()> {
    let path = format!("/courses/{}/enroll", segment(course_id));
    post(fetcher, Access::Bearer, &path, &serde_json::json!({})).await?;
    Ok(())
}

pub async fn delete_student(fetcher: &Fetcher, id: &str) -> ResultE<()> {
    delete(fetcher, Access::Admin, &format!("/students/{}", segment(id))).await?;
    Ok(())
}
