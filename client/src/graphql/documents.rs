//! GraphQL documents sent to the server.

/// List every event with its creator
pub const EVENTS: &str = r"
query Events {
  events {
    _id
    title
    description
    price
    date
    creator {
      _id
    }
  }
}
";

/// Create an event; the payload does not include the creator
pub const CREATE_EVENT: &str = r"
mutation CreateEvent($title: String!, $description: String!, $price: Float!, $date: String!) {
  createEvent(eventInput: {title: $title, description: $description, price: $price, date: $date}) {
    _id
    title
    description
    price
    date
  }
}
";

/// Book an event for the viewer
pub const BOOK_EVENT: &str = r"
mutation BookEvent($eventId: ID!) {
  bookEvent(eventId: $eventId) {
    _id
    createdAt
    updatedAt
  }
}
";

/// Live notifications for events created by anyone
pub const EVENT_ADDED: &str = r"
subscription EventAdded {
  eventAdded {
    _id
    title
    description
    price
    date
    creator {
      _id
    }
  }
}
";

/// Exchange credentials for a token
pub const LOGIN: &str = r"
query Login($email: String!, $password: String!) {
  login(email: $email, password: $password) {
    userId
    token
    tokenExpiration
    username
  }
}
";

/// Register a user
pub const CREATE_USER: &str = r"
mutation CreateUser($email: String!, $username: String!, $password: String!) {
  createUser(userInput: {email: $email, username: $username, password: $password}) {
    _id
    email
    username
  }
}
";

/// The viewer's bookings
pub const BOOKINGS: &str = r"
query Bookings {
  bookings {
    _id
    createdAt
    event {
      _id
      title
      date
    }
  }
}
";

/// Cancel one of the viewer's bookings
pub const CANCEL_BOOKING: &str = r"
mutation CancelBooking($bookingId: ID!) {
  cancelBooking(bookingId: $bookingId) {
    _id
    title
  }
}
";
